use crate::cli::commands;
use crate::error::Result;
use crate::menu::{self, MenuContext};
use crate::session::SessionState;
use chrono::{Local, Utc};
use std::path::PathBuf;

pub fn execute(json: bool) -> Result<()> {
    let config = commands::load_config();
    let plugin_path =
        std::env::current_exe().unwrap_or_else(|_| PathBuf::from(env!("CARGO_PKG_NAME")));
    let login_script = config.login_script_path(&plugin_path);
    let now = Utc::now();

    let (selected, profiles, start_url, state) = match commands::session_manager(&config) {
        Ok(manager) => {
            let selected = manager.profiles().selected_profile();
            let state = manager.resolve(&selected, &now);
            (
                selected.clone(),
                manager.profiles().list_sso_profiles(),
                manager.profiles().sso_start_url(&selected),
                state,
            )
        }
        Err(e) => {
            tracing::warn!("Could not locate AWS files: {}", e);
            (
                config.fallback_profile.clone(),
                Vec::new(),
                None,
                SessionState::NoSession,
            )
        }
    };

    if json {
        let mut report = state.report(&selected, &profiles);
        report.start_url = start_url.as_deref();
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let ctx = MenuContext {
        plugin_path: &plugin_path,
        login_script: &login_script,
        selected_profile: &selected,
        profiles: &profiles,
    };
    print!("{}", menu::render(&state, &ctx, &Local));

    Ok(())
}
