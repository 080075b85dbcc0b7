//! Release notes generated from the issues and pull requests of a milestone.
use color_eyre::eyre::eyre;
use log::*;
use regex::Regex;
use serde::Serialize;
use std::{collections::BTreeMap, sync::LazyLock};

use crate::{
    forge::{manager::ForgeManager, types::MilestoneItem},
    result::Result,
    settings::{ExtraInfo, GeneratorSettings},
};

/// [Tera](https://github.com/Keats/tera) template the notes are rendered
/// with.
pub const DEFAULT_NOTES_TEMPLATE: &str = r#"# {{ header_text }}
{% if environment -%}
## {{ environment }} Release Notes - {{ version }}
{% else -%}
## Release Notes - {{ version }}
{% endif -%}
<sub>{{ timestamp | date(format="%B %d, %Y") }}</sub>
{% if extra_info %}
### {{ extra_info.title }}
{{ extra_info.text }}
{% endif -%}
{% for category in categories %}
### {{ category.name }}
{% for item in category.items -%}
1. [#{{ item.number }}]({{ item.html_url }}) - {{ item.title }}
{% endfor -%}
{% endfor -%}
"#;

static VERSION_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(-preview\.(0|[1-9]\d*))?$")
        .unwrap()
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotesItem {
    pub number: u64,
    pub title: String,
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotesCategory {
    pub name: String,
    pub items: Vec<NotesItem>,
}

/// Everything the template renders.
#[derive(Debug, Clone, Serialize)]
pub struct NotesContext {
    pub header_text: String,
    pub version: String,
    pub environment: Option<String>,
    pub extra_info: Option<ExtraInfo>,
    pub timestamp: i64,
    pub categories: Vec<NotesCategory>,
}

fn wrap(word: &str, marker: &str) -> String {
    format!("{marker}{word}{marker}")
}

fn style_word(word: &str, style: &str) -> String {
    match style.trim().to_lowercase().as_str() {
        "bold" => wrap(word, "**"),
        "italic" => wrap(word, "_"),
        "bold-italic" | "bolditalic" => wrap(word, "***"),
        "code" => wrap(word, "`"),
        other => {
            warn!("unknown word style '{other}' for word '{word}'");
            word.to_string()
        }
    }
}

/// Apply the configured version styling to a version string.
fn style_version(version: &str, settings: &GeneratorSettings) -> String {
    let bold = settings.bolded_versions.unwrap_or(false);
    let italic = settings.italic_versions.unwrap_or(false);

    match (bold, italic) {
        (true, true) => wrap(version, "***"),
        (true, false) => wrap(version, "**"),
        (false, true) => wrap(version, "_"),
        (false, false) => version.to_string(),
    }
}

/// Clean up an issue or pull request title for the notes.
pub fn format_title(title: &str, settings: &GeneratorSettings) -> String {
    let mut title = title.to_string();

    for emoji in settings.emojis_to_remove_from_title.iter().flatten() {
        title = title.replace(emoji.as_str(), "");
    }

    let empty = BTreeMap::new();
    let first_words = settings.first_word_replacements.as_ref().unwrap_or(&empty);
    let styles = settings.style_words_list.as_ref().unwrap_or(&empty);

    title
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let mut word = word.to_string();

            if i == 0
                && let Some(replacement) = first_words.get(&word)
            {
                word = replacement.clone();
            }

            if let Some(replacement) = settings.word_replacements.get(&word) {
                word = replacement.clone();
            }

            if let Some(style) = styles.get(&word) {
                return style_word(&word, style);
            }

            if VERSION_WORD.is_match(&word) {
                return style_version(&word, settings);
            }

            word
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Group milestone items into categories. Categories follow the issue
/// mappings and then the pull request mappings, each ordered by label, with
/// the other category last. Empty categories are left out.
pub fn categorize(
    items: &[MilestoneItem],
    settings: &GeneratorSettings,
) -> Vec<NotesCategory> {
    let empty = BTreeMap::new();
    let issue_mappings =
        settings.issue_category_label_mappings.as_ref().unwrap_or(&empty);
    let pr_mappings = settings.pr_category_label_mappings.as_ref().unwrap_or(&empty);
    let ignore = settings.ignore_labels.clone().unwrap_or_default();
    let other = settings.other_category_name().to_string();

    let mut order: Vec<String> = vec![];
    for name in issue_mappings.values().chain(pr_mappings.values()) {
        if !order.contains(name) {
            order.push(name.clone());
        }
    }
    if !order.contains(&other) {
        order.push(other.clone());
    }

    let mut grouped: BTreeMap<String, Vec<NotesItem>> = BTreeMap::new();

    for item in items.iter() {
        if item.labels.iter().any(|l| ignore.contains(l)) {
            debug!("ignoring #{} because of its labels", item.number);
            continue;
        }

        let mappings = if item.is_pull_request {
            pr_mappings
        } else {
            issue_mappings
        };

        let category = item
            .labels
            .iter()
            .find_map(|l| mappings.get(l))
            .cloned()
            .unwrap_or_else(|| other.clone());

        grouped.entry(category).or_default().push(NotesItem {
            number: item.number,
            title: format_title(&item.title, settings),
            html_url: item.html_url.clone(),
        });
    }

    order
        .into_iter()
        .filter_map(|name| {
            grouped
                .remove(&name)
                .map(|items| NotesCategory { name, items })
        })
        .collect()
}

/// Build the template context for `items`.
pub fn build_context(
    settings: &GeneratorSettings,
    items: &[MilestoneItem],
    timestamp: i64,
) -> NotesContext {
    let version = settings
        .version
        .clone()
        .unwrap_or_else(|| settings.milestone_name.clone());

    NotesContext {
        header_text: settings.header_text.clone(),
        version: style_version(&version, settings),
        environment: settings.environment().map(str::to_string),
        extra_info: settings.extra_info.clone(),
        timestamp,
        categories: categorize(items, settings),
    }
}

/// Render notes for a prepared context.
pub fn render(context: &NotesContext) -> Result<String> {
    let context = tera::Context::from_serialize(context)?;
    let notes = tera::Tera::one_off(DEFAULT_NOTES_TEMPLATE, &context, false)?;
    Ok(notes)
}

/// Generates release notes from the milestone named in the settings.
pub struct NotesGenerator<'a> {
    forge: &'a ForgeManager,
}

impl<'a> NotesGenerator<'a> {
    pub fn new(forge: &'a ForgeManager) -> Self {
        Self { forge }
    }

    pub async fn generate(&self, settings: &GeneratorSettings) -> Result<String> {
        if settings.owner_name != self.forge.owner()
            || settings.repo_name != self.forge.repo()
        {
            warn!(
                "release notes settings name {}/{} but notes are generated from {}/{}",
                settings.owner_name,
                settings.repo_name,
                self.forge.owner(),
                self.forge.repo()
            );
        }

        let milestone = self
            .forge
            .find_milestone(&settings.milestone_name)
            .await?
            .ok_or_else(|| {
                eyre!("the milestone '{}' does not exist", settings.milestone_name)
            })?;

        let items = self.forge.get_milestone_items(milestone.number).await?;
        info!(
            "generating release notes from {} milestone items",
            items.len()
        );

        let context = build_context(settings, &items, chrono::Utc::now().timestamp());

        render(&context)
    }
}
