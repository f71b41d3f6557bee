// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end flow through the public API: prompt table from config,
//! translation stream, and classification against one shared provider.

use std::sync::Arc;

use futures::StreamExt;
use rolebridge_config::load_config_from_str;
use rolebridge_core::{CompletionEvent, CompletionProvider, Role};
use rolebridge_test_utils::{MockProvider, StreamScript};
use rolebridge_translate::{PromptTable, RoleClassifier, start_translation};

#[tokio::test]
async fn configured_direction_streams_with_its_prompt() {
    let config = load_config_from_str(
        r#"
[directions]
qa_to_dev = "Turn QA findings into a bug report."
"#,
    )
    .unwrap();
    let prompts = PromptTable::from_config(&config);
    let mock = Arc::new(MockProvider::with_fragments(&["Steps", " to reproduce"]));

    let events: Vec<_> = start_translation(mock.clone(), &prompts, "login broken", "qa_to_dev")
        .unwrap()
        .collect()
        .await;

    assert_eq!(events.len(), 3);
    assert_eq!(events.last(), Some(&CompletionEvent::Done));
    let req = &mock.requests().await[0];
    assert_eq!(req.messages[0].content, "Turn QA findings into a bug report.");
}

#[tokio::test]
async fn translation_and_classification_share_a_provider() {
    let mock = Arc::new(MockProvider::new());
    mock.push_stream(StreamScript::Chunks(vec![])).await;
    mock.push_completion("product").await;
    let provider: Arc<dyn CompletionProvider> = mock.clone();

    let prompts = PromptTable::builtin();
    let events: Vec<_> = start_translation(provider.clone(), &prompts, "ship it", "product_to_dev")
        .unwrap()
        .collect()
        .await;
    assert_eq!(events, vec![CompletionEvent::Done]);

    let classification = RoleClassifier::new(provider).classify("ship it").await;
    assert_eq!(classification.role, Role::Product);
    assert_eq!(mock.calls(), 2);
}
