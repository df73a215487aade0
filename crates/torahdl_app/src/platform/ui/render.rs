use torahdl_core::{AppViewModel, DownloadState, PreviewView};

/// Lines describing what changed between two views.
pub fn render(prev: &AppViewModel, view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if view.loading && !prev.loading {
        lines.push(match &view.matching_site {
            Some(site) => format!("Processing ({})...", site.name),
            None => "Processing...".to_string(),
        });
    }

    if view.preview != prev.preview {
        if let Some(preview) = &view.preview {
            lines.extend(preview_lines(preview));
        }
    }

    if view.error != prev.error {
        if let Some(error) = &view.error {
            lines.push(format!("Error: {error}"));
        }
    }

    if view.download != prev.download {
        match &view.download {
            DownloadState::Idle => {}
            DownloadState::InProgress { file_name } => lines.push(format!("Saving {file_name}...")),
            DownloadState::Saved(saved) => lines.push(format!(
                "Saved {} bytes to {}",
                format_with_commas(saved.bytes),
                saved.path.display()
            )),
            DownloadState::Failed(message) => lines.push(format!("Error: {message}")),
        }
    }

    lines
}

pub fn render_sites(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec!["Supported Sites".to_string()];
    if view.sites_loading {
        lines.push("  Loading...".to_string());
    } else if view.sites.is_empty() {
        lines.push("  No supported sites available.".to_string());
    } else {
        lines.extend(
            view.sites
                .iter()
                .map(|site| format!("  {} - {}", site.name, site.url)),
        );
    }
    lines
}

pub fn help_lines() -> Vec<String> {
    [
        "Enter a link from a supported Jewish media site to get a direct download link.",
        "  :sites     list supported sites",
        "  :refresh   reload the supported sites",
        "  :save      save the last result into the output directory",
        "  :quit      leave",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect()
}

fn preview_lines(preview: &PreviewView) -> Vec<String> {
    vec![
        preview.title.clone(),
        format!("Format: {}", preview.file_format),
        format!("{}: {}", preview.download_label, preview.download_url),
        format!("File name: {} (:save to keep a copy)", preview.file_name),
    ]
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use torahdl_core::{SavedMedia, Site, GENERIC_FAILURE_MESSAGE};

    use super::*;

    fn audio_preview() -> PreviewView {
        PreviewView {
            title: "Daf Yomi".to_string(),
            file_format: "audio/mpeg".to_string(),
            download_url: "https://cdn.example/a.mp3".to_string(),
            file_name: "daf.mp3".to_string(),
            download_label: "Download Audio",
        }
    }

    #[test]
    fn unchanged_view_renders_nothing() {
        let view = AppViewModel::default();
        assert!(render(&view, &view).is_empty());
    }

    #[test]
    fn loading_mentions_matching_site() {
        let prev = AppViewModel::default();
        let view = AppViewModel {
            loading: true,
            matching_site: Some(Site {
                name: "AllDaf".to_string(),
                url: "https://alldaf.org".to_string(),
            }),
            ..AppViewModel::default()
        };
        assert_eq!(render(&prev, &view), vec!["Processing (AllDaf)...".to_string()]);
    }

    #[test]
    fn success_shows_title_format_and_label() {
        let prev = AppViewModel {
            loading: true,
            ..AppViewModel::default()
        };
        let view = AppViewModel {
            preview: Some(audio_preview()),
            ..AppViewModel::default()
        };
        assert_eq!(
            render(&prev, &view),
            vec![
                "Daf Yomi".to_string(),
                "Format: audio/mpeg".to_string(),
                "Download Audio: https://cdn.example/a.mp3".to_string(),
                "File name: daf.mp3 (:save to keep a copy)".to_string(),
            ]
        );
    }

    #[test]
    fn failure_shows_only_the_user_message() {
        let prev = AppViewModel {
            loading: true,
            ..AppViewModel::default()
        };
        let view = AppViewModel {
            error: Some(GENERIC_FAILURE_MESSAGE.to_string()),
            ..AppViewModel::default()
        };
        assert_eq!(
            render(&prev, &view),
            vec![format!("Error: {GENERIC_FAILURE_MESSAGE}")]
        );
    }

    #[test]
    fn saved_file_reports_size() {
        let prev = AppViewModel::default();
        let view = AppViewModel {
            download: DownloadState::Saved(SavedMedia {
                path: PathBuf::from("daf.mp3"),
                bytes: 1_234_567,
            }),
            ..AppViewModel::default()
        };
        assert_eq!(
            render(&prev, &view),
            vec!["Saved 1,234,567 bytes to daf.mp3".to_string()]
        );
    }

    #[test]
    fn site_listing_states() {
        let loading = AppViewModel {
            sites_loading: true,
            ..AppViewModel::default()
        };
        assert_eq!(render_sites(&loading)[1], "  Loading...");

        let empty = AppViewModel::default();
        assert_eq!(render_sites(&empty)[1], "  No supported sites available.");

        let loaded = AppViewModel {
            sites: vec![Site {
                name: "AllDaf".to_string(),
                url: "https://alldaf.org".to_string(),
            }],
            ..AppViewModel::default()
        };
        assert_eq!(render_sites(&loaded)[1], "  AllDaf - https://alldaf.org");
    }
}
