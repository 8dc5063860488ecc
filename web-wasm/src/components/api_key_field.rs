//! APIキー入力欄

use crate::settings::remember_api_key;
use leptos::prelude::*;

#[component]
pub fn ApiKeyField(api_key: RwSignal<String>) -> impl IntoView {
    view! {
        <div class="settings-panel">
            <div class="form-group">
                <label for="api-key">"Gemini API Key"</label>
                <input
                    type="password"
                    id="api-key"
                    placeholder="API Keyを入力..."
                    prop:value=move || api_key.get()
                    on:input=move |ev| {
                        let value = event_target_value(&ev).trim().to_string();
                        remember_api_key(&value);
                        api_key.set(value);
                    }
                />
                <a
                    href="https://aistudio.google.com/app/apikey"
                    target="_blank"
                    rel="noopener noreferrer"
                    class="api-key-link"
                >
                    "Get an API key →"
                </a>
            </div>
        </div>
    }
}
