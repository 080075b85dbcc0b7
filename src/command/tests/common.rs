//! Shared helpers for command workflow tests.
use std::{collections::VecDeque, sync::Mutex};

use crate::{
    error::AdminError,
    forge::{
        config::RemoteConfig, manager::ForgeManager, traits::MockForge,
        types::Tag,
    },
    prompt::MockPrompter,
};

pub const OWNER: &str = "KinsonDigital";
pub const REPO: &str = "kd-admin";

pub fn remote_config() -> RemoteConfig {
    RemoteConfig {
        owner: OWNER.into(),
        repo: REPO.into(),
        ..Default::default()
    }
}

/// Creates a manager over a mock forge after adding the remote config
/// expectation every manager needs.
pub fn create_test_manager(mut mock_forge: MockForge) -> ForgeManager {
    mock_forge.expect_remote_config().returning(remote_config);
    ForgeManager::new(Box::new(mock_forge))
}

/// Answer `input` prompts whose message contains `key` with `answers` in
/// order.
pub fn expect_inputs(
    prompter: &mut MockPrompter,
    key: &'static str,
    answers: &[&'static str],
) {
    let answers = Mutex::new(answers.iter().copied().collect::<VecDeque<_>>());
    let count = answers.lock().unwrap().len();

    prompter
        .expect_input()
        .withf(move |message| message.contains(key))
        .times(count)
        .returning(move |_| {
            Ok(answers.lock().unwrap().pop_front().unwrap().to_string())
        });
}

pub fn tags(names: &[&str]) -> Vec<Tag> {
    names
        .iter()
        .map(|n| Tag {
            name: n.to_string(),
        })
        .collect()
}

pub fn is_precondition(report: &color_eyre::Report) -> bool {
    matches!(
        report.downcast_ref::<AdminError>(),
        Some(AdminError::Precondition(_))
    )
}

pub fn is_config(report: &color_eyre::Report) -> bool {
    matches!(
        report.downcast_ref::<AdminError>(),
        Some(AdminError::Config(_))
    )
}
