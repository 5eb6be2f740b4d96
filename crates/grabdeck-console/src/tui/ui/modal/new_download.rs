/*
[INPUT]:  Download defaults from configuration, key events
[OUTPUT]: New download form with live platform indicator
[POS]:    TUI UI modal - start a download
[UPDATE]: When download options change
*/

use crossterm::event::KeyCode;
use grabdeck_adapter::DownloadOptions;
use grabdeck_console::format::Platform;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use super::{Field, Modal, ModalAction, handle_modal_key};

const QUALITY_OPTIONS: [&str; 5] = ["best", "1080p", "720p", "480p", "audio"];

pub(in crate::tui) struct NewDownloadModal {
    url: String,
    quality_index: usize,
    qualities: Vec<String>,
    output_dir: String,
    use_proxy: bool,
    focus_index: usize,
}

impl NewDownloadModal {
    pub(in crate::tui) fn new(defaults: &DownloadOptions) -> Self {
        let mut qualities: Vec<String> = QUALITY_OPTIONS.iter().map(|q| q.to_string()).collect();
        let quality_index = match qualities.iter().position(|q| q == &defaults.quality) {
            Some(index) => index,
            None => {
                qualities.insert(0, defaults.quality.clone());
                0
            }
        };
        Self {
            url: String::new(),
            quality_index,
            qualities,
            output_dir: defaults.output_dir.clone(),
            use_proxy: defaults.use_proxy,
            focus_index: 0,
        }
    }

    pub(in crate::tui) fn to_modal(&self) -> Modal {
        let platform = Platform::detect(&self.url);
        let hint_style = match platform {
            Platform::Unknown => Style::default().fg(Color::DarkGray),
            _ => Style::default().fg(Color::LightGreen),
        };
        Modal {
            title: String::from("New Download"),
            focus_index: self.focus_index,
            fields: vec![
                Field::TextInput {
                    label: String::from("URL"),
                    value: self.url.clone(),
                },
                Field::Select {
                    label: String::from("Quality"),
                    options: self.qualities.clone(),
                    selected: self.quality_index,
                },
                Field::TextInput {
                    label: String::from("Output dir"),
                    value: self.output_dir.clone(),
                },
                Field::Toggle {
                    label: String::from("Use proxy"),
                    value: self.use_proxy,
                },
                Field::Button {
                    label: String::from("Download"),
                    action: ModalAction::Submit,
                },
                Field::Button {
                    label: String::from("Cancel"),
                    action: ModalAction::Cancel,
                },
            ],
            hint: Some(Line::from(vec![
                Span::raw("Platform: "),
                Span::styled(platform.to_string(), hint_style),
            ])),
        }
    }

    pub(in crate::tui) fn handle_key(&mut self, key: KeyCode) -> ModalAction {
        let mut modal = self.to_modal();
        let action = handle_modal_key(&mut modal, key);
        self.apply_modal_state(&modal);
        action
    }

    pub(in crate::tui) fn url(&self) -> &str {
        self.url.as_str()
    }

    pub(in crate::tui) fn options(&self) -> DownloadOptions {
        DownloadOptions {
            quality: self
                .qualities
                .get(self.quality_index)
                .cloned()
                .unwrap_or_else(|| QUALITY_OPTIONS[0].to_string()),
            output_dir: self.output_dir.clone(),
            use_proxy: self.use_proxy,
        }
    }

    fn apply_modal_state(&mut self, modal: &Modal) {
        self.focus_index = modal.focus_index;
        if let Some(Field::TextInput { value, .. }) = modal.fields.first() {
            self.url = value.clone();
        }
        if let Some(Field::Select { selected, .. }) = modal.fields.get(1) {
            self.quality_index = *selected;
        }
        if let Some(Field::TextInput { value, .. }) = modal.fields.get(2) {
            self.output_dir = value.clone();
        }
        if let Some(Field::Toggle { value, .. }) = modal.fields.get(3) {
            self.use_proxy = *value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(modal: &mut NewDownloadModal, text: &str) {
        for ch in text.chars() {
            modal.handle_key(KeyCode::Char(ch));
        }
    }

    #[test]
    fn collects_url_and_options() {
        let mut modal = NewDownloadModal::new(&DownloadOptions::default());
        type_text(&mut modal, "https://b23.tv/x");
        modal.handle_key(KeyCode::Tab);
        modal.handle_key(KeyCode::Right);
        modal.handle_key(KeyCode::Tab);
        modal.handle_key(KeyCode::Tab);
        modal.handle_key(KeyCode::Enter);

        assert_eq!(modal.url(), "https://b23.tv/x");
        let options = modal.options();
        assert_eq!(options.quality, "1080p");
        assert_eq!(options.output_dir, "./downloads");
        assert!(!options.use_proxy);
    }

    #[test]
    fn unknown_default_quality_is_offered_first() {
        let defaults = DownloadOptions {
            quality: "4k".to_string(),
            ..DownloadOptions::default()
        };
        let modal = NewDownloadModal::new(&defaults);
        assert_eq!(modal.options().quality, "4k");
    }

    #[test]
    fn platform_hint_follows_url() {
        let mut modal = NewDownloadModal::new(&DownloadOptions::default());
        type_text(&mut modal, "https://youtu.be/abc");
        let hint = modal.to_modal().hint.expect("hint");
        assert!(hint.spans.iter().any(|span| span.content == "youtube"));
    }
}
