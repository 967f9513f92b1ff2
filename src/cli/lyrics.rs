use tabled::Table;

use crate::{
    cli::{ready_state, spinner},
    error,
    error::SpotifyError,
    types::LyricTableRow,
    utils, warning,
};

pub async fn lyrics(track_id: String) {
    let state = ready_state().await;

    let pb = spinner("Fetching lyrics...");
    let result = state.lyrics.fetch(&track_id).await;
    pb.finish_and_clear();

    let lines = match result {
        Ok(lines) => lines,
        Err(SpotifyError::NotFound) => {
            warning!("No lyrics found for {}", track_id);
            return;
        }
        Err(e) => error!("Failed to fetch lyrics. Err: {}", e),
    };

    let rows: Vec<LyricTableRow> = lines
        .into_iter()
        .map(|line| LyricTableRow {
            start: utils::format_timestamp(line.start_time_ms),
            words: line.words,
        })
        .collect();

    println!("{}", Table::new(rows));
}
