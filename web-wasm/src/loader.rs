//! 画像読み込み（ブラウザ）
//!
//! - デフォルト画像: 静的パスをfetch
//! - ユーザー画像: FileReaderをawait可能にしてData URLを得る

use crate::js::js_message;
use futures::channel::oneshot;
use std::cell::RefCell;
use std::rc::Rc;
use tree_id_common::image::mime_from_path;
use tree_id_common::{EncodedImage, Error, Result, DEFAULT_IMAGE_PATH};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FileReader, ProgressEvent, Response};

fn load_error(value: JsValue) -> Error {
    Error::Load(js_message(&value))
}

/// 同梱のデフォルト画像を取得
pub async fn fetch_default_image() -> Result<EncodedImage> {
    let window = web_sys::window().ok_or_else(|| Error::Load("window not available".into()))?;
    let resp_value = JsFuture::from(window.fetch_with_str(DEFAULT_IMAGE_PATH))
        .await
        .map_err(load_error)?;
    let resp: Response = resp_value.dyn_into().map_err(load_error)?;

    if !resp.ok() {
        return Err(Error::Load(format!("{} {}", resp.status(), resp.status_text())));
    }

    let mime_type = resp
        .headers()
        .get("Content-Type")
        .ok()
        .flatten()
        .filter(|m| m.starts_with("image/"))
        .or_else(|| mime_from_path(DEFAULT_IMAGE_PATH).map(String::from))
        .unwrap_or_else(|| "image/png".to_string());

    let buffer = JsFuture::from(resp.array_buffer().map_err(load_error)?)
        .await
        .map_err(load_error)?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    Ok(EncodedImage::from_bytes(mime_type, &bytes))
}

type ReadResult = std::result::Result<String, String>;

/// ファイルをData URLとして読み込む
pub async fn read_file(file: &File) -> Result<EncodedImage> {
    let reader = FileReader::new().map_err(|e| Error::Read(js_message(&e)))?;
    let (tx, rx) = oneshot::channel::<ReadResult>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let onload = {
        let reader = reader.clone();
        let tx = tx.clone();
        Closure::<dyn FnMut(ProgressEvent)>::new(move |_: ProgressEvent| {
            let result = reader
                .result()
                .ok()
                .and_then(|v| v.as_string())
                .ok_or_else(|| "empty result".to_string());
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(result);
            }
        })
    };

    let onerror = {
        let tx = tx.clone();
        Closure::<dyn FnMut(ProgressEvent)>::new(move |_: ProgressEvent| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err("FileReader error".to_string()));
            }
        })
    };

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    reader
        .read_as_data_url(file)
        .map_err(|e| Error::Read(js_message(&e)))?;

    let result = rx.await;

    // コールバックを外してからクロージャを破棄
    reader.set_onload(None);
    reader.set_onerror(None);
    drop(onload);
    drop(onerror);

    let data_url = result
        .map_err(|_| Error::Read("read cancelled".into()))?
        .map_err(Error::Read)?;

    EncodedImage::from_data_url(&data_url)
        .ok_or_else(|| Error::Read("unexpected data URL".into()))
}
