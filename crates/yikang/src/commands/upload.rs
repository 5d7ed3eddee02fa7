//! Image upload handler.

use std::sync::Arc;

use serde::Serialize;

use yikang_core::upload::ImageUploader;

use crate::app::App;
use crate::cli::{GlobalOpts, UploadArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct Uploaded {
    file: String,
    folder: String,
    public_url: String,
}

pub async fn handle(app: &App, args: UploadArgs, global: &GlobalOpts) -> Result<(), CliError> {
    app.require_admin().await?;
    let backend = app.backend();
    let uploader = ImageUploader::new(Arc::clone(backend.client()), Arc::clone(backend.auth()));

    let spinner = util::spinner("上传中...", global.quiet);
    let result = uploader.upload_file(&args.file, Some(&args.folder)).await;
    spinner.finish_and_clear();
    let public_url = result?;

    let uploaded = Uploaded {
        file: args.file.display().to_string(),
        folder: args.folder,
        public_url,
    };
    let out = output::render_single(
        &global.output,
        &uploaded,
        |u| u.public_url.clone(),
        |u| u.public_url.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
