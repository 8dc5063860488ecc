//! アップロードエリアコンポーネント
//!
//! 1枚だけ受け取り、検証と読み込みは呼び出し側に任せる

use leptos::prelude::*;
use tree_id_common::image::accept_attribute;
use web_sys::{DragEvent, File, HtmlInputElement};

#[component]
pub fn UploadArea<F>(is_loading: Signal<bool>, on_file: F) -> impl IntoView
where
    F: Fn(File) + 'static + Clone,
{
    let (is_dragover, set_is_dragover) = signal(false);

    let on_change = {
        let on_file = on_file.clone();
        move |ev: web_sys::Event| {
            let input: HtmlInputElement = event_target(&ev);
            if let Some(file) = input.files().and_then(|files| files.get(0)) {
                on_file(file);
            }
            // 同じファイルを選び直せるように
            input.set_value("");
        }
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);

        if is_loading.get_untracked() {
            return;
        }

        if let Some(file) = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0))
        {
            on_file(file);
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        if !is_loading.get_untracked() {
            set_is_dragover.set(true);
        }
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    view! {
        <label
            class=move || {
                let mut classes = vec!["upload-area"];
                if is_dragover.get() {
                    classes.push("dragover");
                }
                if is_loading.get() {
                    classes.push("disabled");
                }
                classes.join(" ")
            }
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragleave=on_dragleave
        >
            <input
                type="file"
                class="file-input"
                accept=accept_attribute()
                disabled=move || is_loading.get()
                on:change=on_change
            />
            <div class="upload-icon">"🌳"</div>
            <p>"Drop a tree photo here or click to choose one"</p>
            <p class="text-muted">"JPEG or PNG, up to 20 MB"</p>
        </label>
    }
}
