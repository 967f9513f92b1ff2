use crate::{
    cli::{local_state, spinner},
    success,
};

pub async fn secret() {
    let state = local_state();
    let secrets = state.tokens.secrets();

    let pb = spinner("Fetching TOTP secrets...");
    secrets.ensure_fresh().await;
    pb.finish_and_clear();

    let seed = secrets.current_seed().await;
    success!("Using TOTP secret version {}", seed.version);
}
