//! Executes reducer-emitted effects against the injected host services.

use panel_host::{
    base_name, load_browser_prefs, save_pref_with, ApiError, HostServices, FILE_BROWSER_PREFS_KEY,
    ZIP_MIME_TYPE,
};

use crate::{
    model::OperationKind,
    reducer::{BrowserAction, BrowserEffect},
    trace,
};

/// Runs one [`BrowserEffect`] and reports its completion through `emit`.
///
/// Uploads may emit several progress actions before the final result. Effects that only signal
/// the host emit nothing.
pub async fn run_effect(
    services: &HostServices,
    effect: BrowserEffect,
    emit: &dyn Fn(BrowserAction),
) {
    match effect {
        BrowserEffect::FetchListing {
            generation,
            path,
            sort_by,
            direction,
        } => {
            let result = services.files.list(&path, sort_by, direction).await;
            emit(BrowserAction::ListingLoaded {
                generation,
                path,
                result,
            });
        }
        BrowserEffect::FetchMetadata { path } => {
            let result = services.files.metadata(&path).await;
            emit(BrowserAction::MetadataLoaded { path, result });
        }
        BrowserEffect::FetchSettings => {
            let result = services.files.settings().await;
            emit(BrowserAction::SettingsLoaded { result });
        }
        BrowserEffect::LoadPrefs => match load_browser_prefs(services.prefs.as_ref()).await {
            Ok(prefs) => emit(BrowserAction::PrefsLoaded { prefs }),
            Err(err) => emit(BrowserAction::HostActionFinished {
                kind: OperationKind::Prefs,
                result: Err(err),
            }),
        },
        BrowserEffect::PersistPrefs(prefs) => {
            if let Err(err) =
                save_pref_with(services.prefs.as_ref(), FILE_BROWSER_PREFS_KEY, &prefs).await
            {
                emit(BrowserAction::HostActionFinished {
                    kind: OperationKind::Prefs,
                    result: Err(err),
                });
            }
        }
        BrowserEffect::Upload(job) => {
            let (session, index) = (job.session, job.index);
            let progress = |percent: u8| {
                emit(BrowserAction::UploadProgress {
                    session,
                    index,
                    percent,
                })
            };
            let result = services
                .files
                .upload(&job.file, &job.directory, job.overwrite, &progress)
                .await;
            emit(BrowserAction::UploadFinished {
                session,
                index,
                result,
            });
        }
        BrowserEffect::Delete(job) => {
            let result = services
                .files
                .delete(&job.path, &job.confirm_filename)
                .await;
            emit(BrowserAction::DeleteFinished {
                operation: job.operation,
                index: job.index,
                result,
            });
        }
        BrowserEffect::Zip(job) => {
            let result = match services.files.zip(&job.paths).await {
                Ok(bytes) => services
                    .downloads
                    .save_bytes(&job.file_name, ZIP_MIME_TYPE, &bytes)
                    .await
                    .map_err(ApiError::Host),
                Err(err) => Err(err),
            };
            emit(BrowserAction::ZipFinished {
                operation: job.operation,
                result,
            });
        }
        BrowserEffect::Rename { path, new_name } => {
            let result = services.files.rename(&path, &new_name).await;
            emit(BrowserAction::MutationFinished {
                kind: OperationKind::Rename,
                subject: new_name,
                result,
            });
        }
        BrowserEffect::Move { path, destination } => {
            let result = services.files.move_entry(&path, &destination).await;
            emit(BrowserAction::MutationFinished {
                kind: OperationKind::Move,
                subject: destination,
                result,
            });
        }
        BrowserEffect::CreateFolder { parent, name } => {
            let result = services.files.mkdir(&parent, &name).await;
            emit(BrowserAction::MutationFinished {
                kind: OperationKind::Mkdir,
                subject: name,
                result,
            });
        }
        BrowserEffect::Replace { path, file } => {
            // Content replacement has no progress display.
            let result = services.files.replace(&path, &file, &|_: u8| {}).await;
            emit(BrowserAction::MutationFinished {
                kind: OperationKind::Replace,
                subject: base_name(&path).to_string(),
                result,
            });
        }
        BrowserEffect::CopyText { text } => {
            let result = services.downloads.copy_text(&text).await;
            emit(BrowserAction::HostActionFinished {
                kind: OperationKind::CopyUrl,
                result,
            });
        }
        BrowserEffect::OpenDownload { path } => {
            let url = services.files.download_url(&path);
            let result = services.downloads.open_url(&url).await;
            emit(BrowserAction::HostActionFinished {
                kind: OperationKind::Download,
                result,
            });
        }
        BrowserEffect::UploadsCompleted { uploaded } => trace::trace_uploads_completed(uploaded),
    }
}
