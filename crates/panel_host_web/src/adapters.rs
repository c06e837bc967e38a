//! Concrete adapter factories for browser runtime wiring.

use std::rc::Rc;

use panel_host::HostServices;

use crate::{ApiConfig, WebDownloadService, WebFileStoreService, WebPrefsStore};

/// Browser service bundle for the file-hosting console at `config`.
pub fn browser_host_services(config: ApiConfig) -> HostServices {
    HostServices::new(
        Rc::new(WebFileStoreService::new(config)),
        Rc::new(WebDownloadService),
        Rc::new(WebPrefsStore),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn browser_services_use_configured_download_base() {
        let services = browser_host_services(ApiConfig::with_base("https://files.example.com/api"));
        assert_eq!(
            services.files.download_url("/report.pdf"),
            "https://files.example.com/api/files/download?path=%2Freport.pdf"
        );
    }
}
