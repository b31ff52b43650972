//! Prints `WatchEvent`s to stdout: one human-readable line normally, or one
//! NDJSON record per event when `--json` is passed.

use crate::application::WatchEvent;

pub fn emit(event: &WatchEvent, json: bool) {
    if json {
        println!("{}", event.to_json());
    } else {
        println!("{}", event.human_readable());
    }
}
