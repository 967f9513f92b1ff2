use crate::{
    cli::{ready_state, spinner},
    error, success,
    types::ResolvedArtwork,
    warning,
};

pub async fn canvas(track_id: String) {
    let state = ready_state().await;

    let pb = spinner("Resolving canvas...");
    let result = state.artwork.resolve(&track_id).await;
    pb.finish_and_clear();

    match result {
        Ok(ResolvedArtwork::Canvas(url)) => success!("Canvas: {}", url),
        Ok(ResolvedArtwork::AlbumArt(url)) => success!("Album art: {}", url),
        Ok(ResolvedArtwork::NotFound) => warning!("No canvas or album art for {}", track_id),
        Err(e) => error!("Cannot resolve canvas. Err: {}", e),
    }
}
