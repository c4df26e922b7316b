// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! List command handler

use anyhow::Result;
use clap::Args;
use jobq_core::{DirectoryQueue, QueueState};

use super::StateArg;

#[derive(Args)]
pub struct ListArgs {
    /// Only list this state
    #[arg(value_enum)]
    pub state: Option<StateArg>,
    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

pub fn handle(queue: &DirectoryQueue, args: ListArgs) -> Result<()> {
    let states: Vec<QueueState> = match args.state {
        Some(state) => vec![state.into()],
        None => QueueState::ALL.to_vec(),
    };

    let mut listing = Vec::with_capacity(states.len());
    for state in states {
        listing.push((state, visible(queue, state)?));
    }
    print!("{}", render(&listing, args.state.is_some(), args.json)?);
    Ok(())
}

/// Names in a state directory; a directory that does not exist yet is empty.
fn visible(queue: &DirectoryQueue, state: QueueState) -> Result<Vec<String>> {
    if !queue.path(state).is_dir() {
        return Ok(Vec::new());
    }
    Ok(queue.list(state)?)
}

fn render(listing: &[(QueueState, Vec<String>)], single: bool, json: bool) -> Result<String> {
    let mut out = String::new();
    if json {
        let value = match listing {
            [(_, names)] if single => serde_json::json!(names),
            _ => {
                let mut map = serde_json::Map::new();
                for (state, names) in listing {
                    map.insert(state.to_string(), serde_json::json!(names));
                }
                serde_json::Value::Object(map)
            }
        };
        out.push_str(&serde_json::to_string_pretty(&value)?);
        out.push('\n');
        return Ok(out);
    }

    for (state, names) in listing {
        if single {
            for name in names {
                out.push_str(name);
                out.push('\n');
            }
            continue;
        }
        out.push_str(&format!("{state}:\n"));
        for name in names {
            out.push_str(&format!("  {name}\n"));
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
