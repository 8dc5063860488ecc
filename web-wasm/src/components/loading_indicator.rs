//! 解析中インジケーター

use leptos::prelude::*;

#[component]
pub fn LoadingIndicator() -> impl IntoView {
    view! {
        <div class="loading-container">
            <div class="spinner" />
            <p class="loading-text">"Analyzing your tree..."</p>
        </div>
    }
}
