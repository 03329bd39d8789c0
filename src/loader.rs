//! Tab-separated dataset loaders.
//!
//! Triple splits hold `subject<TAB>relation<TAB>object` lines; mapping files
//! hold `identifier<TAB>text` lines. Short lines are skipped.

use crate::error::Result;
use crate::graph::{GraphBuilder, KnowledgeGraph, TextMapping};
use std::fs::File;
use std::path::Path;

/// Read every record of a headerless tab-separated file.
pub fn read_tsv_records(path: &Path) -> Result<Vec<Vec<String>>> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(str::to_string).collect());
    }
    Ok(records)
}

/// Load an identifier to text mapping.
pub fn load_mapping(path: &Path) -> Result<TextMapping> {
    let mut mapping = TextMapping::new();
    for record in read_tsv_records(path)? {
        if let [key, text, ..] = record.as_slice() {
            mapping.insert(key.trim(), text.trim());
        }
    }
    log::info!("Loaded {} mapping entries from {}", mapping.len(), path.display());
    Ok(mapping)
}

/// Add all triples of one split file to `builder`.
pub fn load_triples_into(builder: &mut GraphBuilder, path: &Path) -> Result<()> {
    let before = (builder.accepted(), builder.skipped());
    builder.add_records(read_tsv_records(path)?);
    log::info!(
        "Loaded {} triples from {} ({} malformed lines skipped)",
        builder.accepted() - before.0,
        path.display(),
        builder.skipped() - before.1
    );
    Ok(())
}

/// Build one graph from the named split files in `folder`.
///
/// Splits that do not exist are skipped with a warning.
pub fn load_graph_from_folder<S: AsRef<str>>(folder: &Path, splits: &[S]) -> Result<KnowledgeGraph> {
    let mut builder = GraphBuilder::new();
    for split in splits {
        let path = folder.join(split.as_ref());
        if !path.exists() {
            log::warn!("Split file not found, skipping: {}", path.display());
            continue;
        }
        load_triples_into(&mut builder, &path)?;
    }

    let graph = builder.build();
    log::info!(
        "Loaded graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KgdescError;
    use crate::graph::EntityId;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_tsv_records_flexible() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("train.tsv");
        fs::write(&path, "a\tr\tb\nshort\tline\nc\tr\td\textra\n").unwrap();

        let records = read_tsv_records(&path).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1], vec!["short", "line"]);
        assert_eq!(records[2].len(), 4);
    }

    #[test]
    fn test_load_mapping_trims_and_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("entity2text.txt");
        fs::write(
            &path,
            "00001 \t dog, a domestic animal \nlonely\n00002\tcat\n00001\thound\n",
        )
        .unwrap();

        let mapping = load_mapping(&path).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.lookup("00001"), "hound");
        assert_eq!(mapping.lookup("00002"), "cat");
        assert_eq!(mapping.lookup("lonely"), "lonely");
    }

    #[test]
    fn test_load_graph_from_folder_merges_splits() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("train.tsv"), "A\tknows\tB\nbad line\n").unwrap();
        fs::write(temp_dir.path().join("test.tsv"), "B\tknows\tC\n A \tknows\t B \n").unwrap();

        let graph =
            load_graph_from_folder(temp_dir.path(), &["train.tsv", "dev.tsv", "test.tsv"]).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.contains(&EntityId::from("C")));
    }

    #[test]
    fn test_missing_mapping_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_mapping(&temp_dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, KgdescError::Io(_)));
    }
}
