//! Exclusion (ban) address list parsing.
//!
//! The exits file is line-oriented: an optional `#<digits>` marker,
//! optional whitespace, then a dotted-quad IPv4 address. Lines that do
//! not match are ignored.

use regex::Regex;
use std::io;
use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;

use crate::state::HotState;

fn exit_line() -> &'static Regex {
    static EXIT_LINE: OnceLock<Regex> = OnceLock::new();
    EXIT_LINE.get_or_init(|| {
        Regex::new(r"^(?:#\d+\s*)?(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})")
            .unwrap()
    })
}

/// Extract addresses from the file text, appending each to `dest`
/// unless already present.
pub fn parse_exits(text: &str, dest: &mut Vec<String>) {
    for line in text.lines() {
        if let Some(caps) = exit_line().captures(line) {
            let addr = &caps[1];
            if !dest.iter().any(|seen| seen == addr) {
                dest.push(addr.to_string());
            }
        }
    }
}

/// Read the exits file and merge its addresses into the live snapshot's
/// ban list.
pub async fn merge_exits(path: &Path, hot: &HotState) -> io::Result<()> {
    let text = fs::read_to_string(path).await?;
    hot.update(|snapshot| parse_exits(&text, &mut snapshot.bans));
    Ok(())
}
