//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"Tree Identifier"</h1>
            <p class="subtitle">"Upload a photo of a tree to learn about it. For educational use only."</p>
        </header>
    }
}
