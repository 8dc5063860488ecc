//! メインアプリケーションコンポーネント
//!
//! 画面状態は共通の `UiState` 1つ。イベントは `dispatch` 経由で `reduce` に渡し、
//! 返ってきたEffectを spawn_local で実行して結果を再投入する。

use crate::api::gemini;
use crate::components::{
    analysis_view::AnalysisView, api_key_field::ApiKeyField, header::Header,
    loading_indicator::LoadingIndicator, upload_area::UploadArea,
};
use crate::loader;
use crate::settings::initial_api_key;
use leptos::prelude::*;
use leptos::task::spawn_local;
use tree_id_common::{
    build_identification_prompt, format_report, reduce, validate_upload, Effect, Event, UiState,
};
use web_sys::File;

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let state = RwSignal::new(UiState::new());
    let api_key = RwSignal::new(initial_api_key());

    // 起動時にデフォルト画像を表示
    dispatch(state, api_key, Event::Mount);

    let is_loading = Signal::derive(move || state.with(|s| s.is_loading()));
    let can_reidentify = move || state.with(|s| s.can_reidentify());
    let blocks = Memo::new(move |_| {
        state.with(|s| s.report().map(format_report).unwrap_or_default())
    });

    let on_file = move |file: File| {
        if let Err(err) = validate_upload(&file.type_(), file.size() as u64) {
            dispatch(state, api_key, Event::FileRejected(err));
            return;
        }
        spawn_local(async move {
            let event = match loader::read_file(&file).await {
                Ok(image) => Event::FileAccepted(image),
                Err(err) => Event::ReadFailed(err.to_string()),
            };
            dispatch(state, api_key, event);
        });
    };

    let on_reidentify = move |_: leptos::ev::MouseEvent| dispatch(state, api_key, Event::Reidentify);

    view! {
        <div class="container">
            <Header />

            <ApiKeyField api_key=api_key />

            <UploadArea is_loading=is_loading on_file=on_file />

            {move || state.with(|s| s.error().map(|message| {
                let message = message.to_string();
                view! { <div class="error-message" role="alert">{message}</div> }
            }))}

            <div class="result">
                {move || state.with(|s| s.image().map(|image| {
                    let src = image.to_data_url();
                    view! { <img class="preview" src=src alt="Tree to identify" /> }
                }))}

                <Show when=move || is_loading.get()>
                    <LoadingIndicator />
                </Show>

                <Show when=move || !is_loading.get()>
                    <AnalysisView blocks=blocks />
                </Show>
            </div>

            <button
                class="btn btn-primary"
                disabled=move || !can_reidentify()
                on:click=on_reidentify
            >
                "Re-identify"
            </button>
        </div>
    }
}

/// イベントを状態に適用し、必要なら非同期処理を起動
fn dispatch(state: RwSignal<UiState>, api_key: RwSignal<String>, event: Event) {
    let effect = state
        .try_update(|s| reduce(s, event))
        .unwrap_or(Effect::None);

    match effect {
        Effect::None => {}
        Effect::LoadDefault => spawn_local(async move {
            let event = match loader::fetch_default_image().await {
                Ok(image) => Event::DefaultLoaded(image),
                Err(err) => Event::DefaultFailed(err.to_string()),
            };
            dispatch(state, api_key, event);
        }),
        Effect::Analyze { ticket, image } => spawn_local(async move {
            let key = api_key.get_untracked();
            let prompt = build_identification_prompt();
            let event = match gemini::analyze(&key, &image, &prompt).await {
                Ok(report) => Event::AnalysisSucceeded { ticket, report },
                Err(err) => Event::AnalysisFailed {
                    ticket,
                    message: Some(err.to_string()),
                },
            };
            dispatch(state, api_key, event);
        }),
    }
}
