use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SessionStarted => {
            // The loader runs once per session; refreshes go through RefreshCatalog.
            if state.catalog_started() || !state.begin_load() {
                return (state, Vec::new());
            }
            vec![Effect::LoadCatalog]
        }
        Msg::RefreshCatalog => {
            if state.begin_load() {
                vec![Effect::LoadCatalog]
            } else {
                Vec::new()
            }
        }
        Msg::CatalogLoaded(result) => {
            if !state.is_catalog_loading() {
                return (state, Vec::new());
            }
            match result {
                Ok(sites) => state.apply_catalog(sites),
                Err(_) => state.fail_catalog(),
            }
            Vec::new()
        }
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::SubmitClicked => match state.begin_submit() {
            Some((request_id, url)) => vec![Effect::Extract { request_id, url }],
            None => Vec::new(),
        },
        Msg::ExtractCompleted { request_id, result } => {
            match result {
                Ok(preview) => state.apply_success(request_id, preview),
                Err(cause) => state.apply_failure(request_id, &cause),
            };
            Vec::new()
        }
        Msg::SaveClicked { target } => match state.begin_save() {
            Some((download_url, file_name)) => vec![Effect::SaveMedia {
                download_url,
                file_name,
                target,
            }],
            None => Vec::new(),
        },
        Msg::SaveCompleted(result) => {
            match result {
                Ok(saved) => state.apply_saved(saved),
                Err(cause) => state.fail_save(&cause),
            }
            Vec::new()
        }
    };

    (state, effects)
}
