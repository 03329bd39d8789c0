//! The relations artifact: blank-line separated text blocks, one per start
//! entity, and the prompt built from each block.

use crate::error::Result;
use std::io::Write;

const CENTER_PREFIX: &str = "Center node:";

/// System message sent with every description request.
pub const SYSTEM_PROMPT: &str = "You are a knowledge graph expert.";

const ENTITY_TEMPLATE: &str = "Write a concise paragraph about {entity} in less than 40 words. \
Start with a clear definition using the entity's own terms; include these relations: {relations}. \
Use appositives or semicolons for structure; avoid lists, markdown, and explicit technical labels. \
Example format: [Entity] refers to [definition]; [contextual relationships].";

/// One parsed block of the relations artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityBlock {
    pub entity: String,
    /// Relation lines joined by single spaces.
    pub relations: String,
}

impl EntityBlock {
    /// Fill the description prompt template.
    pub fn prompt(&self) -> String {
        ENTITY_TEMPLATE
            .replace("{entity}", &self.entity)
            .replace("{relations}", &self.relations)
    }
}

/// Write rendered blocks, each followed by a blank line.
pub fn write_blocks<W: Write, S: AsRef<str>>(writer: &mut W, blocks: &[S]) -> Result<()> {
    for block in blocks {
        writer.write_all(block.as_ref().as_bytes())?;
        writer.write_all(b"\n\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Split the relations artifact into blocks.
///
/// If a block starts with a `Center node:` line, that line names the entity
/// and is dropped from the relations. Otherwise the first line names the
/// entity and stays part of the relations. Either way the name is cut at
/// the first comma.
pub fn parse_blocks(text: &str) -> Vec<EntityBlock> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(finish_block(&current));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(finish_block(&current));
    }

    blocks
}

fn finish_block(lines: &[&str]) -> EntityBlock {
    let (entity, rest) = match lines.split_first() {
        Some((first, rest)) if first.starts_with(CENTER_PREFIX) => {
            let name = first.split_once(':').map_or("", |(_, name)| name);
            (first_clause(name), rest)
        }
        Some((first, _)) => (first_clause(first), lines),
        None => (String::new(), lines),
    };

    EntityBlock {
        entity,
        relations: rest.join(" "),
    }
}

fn first_clause(text: &str) -> String {
    text.split(',').next().unwrap_or("").trim().to_string()
}
