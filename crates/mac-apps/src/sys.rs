//! macOS implementations over `NSWorkspace` and `NSRunningApplication`.

use objc2_app_kit::{
    NSApplicationActivationOptions, NSApplicationActivationPolicy, NSRunningApplication,
    NSWorkspace, NSWorkspaceOpenConfiguration,
};
use objc2_foundation::NSString;
use switch_engine::AppInfo;
use tracing::{debug, info, warn};

/// Fetch the user-activatable applications: regular activation policy only,
/// the host process excluded, ordered by case-insensitive display name.
pub(crate) fn snapshot() -> Vec<AppInfo> {
    let own_pid = std::process::id() as i32;
    let mut out = Vec::new();
    unsafe {
        let ws = NSWorkspace::sharedWorkspace();
        for app in ws.runningApplications().iter() {
            if app.activationPolicy() != NSApplicationActivationPolicy::Regular {
                continue;
            }
            let pid = app.processIdentifier();
            if pid == own_pid {
                continue;
            }
            // Nameless entries cannot be filtered or displayed; skip them.
            let Some(name) = app.localizedName() else {
                continue;
            };
            let bundle_id = app
                .bundleIdentifier()
                .map(|s| s.to_string())
                .unwrap_or_default();
            out.push(AppInfo {
                pid,
                bundle_id,
                name: name.to_string(),
            });
        }
    }
    out.sort_by_cached_key(|app| app.name.to_lowercase());
    debug!(count = out.len(), "running applications snapshot");
    out
}

/// Activate a running application by pid, bringing all its windows forward.
pub(crate) fn activate_pid(pid: i32) -> bool {
    unsafe {
        match NSRunningApplication::runningApplicationWithProcessIdentifier(pid as libc::pid_t) {
            Some(app) => {
                let ok =
                    app.activateWithOptions(NSApplicationActivationOptions::ActivateAllWindows);
                if !ok {
                    warn!(pid, "activateWithOptions returned false");
                }
                ok
            }
            None => {
                warn!(pid, "no running application for pid");
                false
            }
        }
    }
}

/// Activate a running application by bundle identifier. Returns false when
/// no instance is running or activation was refused.
pub(crate) fn activate_bundle(bundle_id: &str) -> bool {
    unsafe {
        let apps = NSRunningApplication::runningApplicationsWithBundleIdentifier(
            &NSString::from_str(bundle_id),
        );
        let Some(app) = apps.iter().next() else {
            debug!(bundle = bundle_id, "no running instance");
            return false;
        };
        let ok = app.activateWithOptions(NSApplicationActivationOptions::ActivateAllWindows);
        if !ok {
            warn!(bundle = bundle_id, "activateWithOptions returned false");
        }
        ok
    }
}

/// Launch an application fresh by bundle identifier with activate-on-open.
/// Fire-and-forget: the outcome is only logged from the completion handler.
pub(crate) fn launch_bundle(bundle_id: &str) {
    unsafe {
        let ws = NSWorkspace::sharedWorkspace();
        let Some(url) =
            ws.URLForApplicationWithBundleIdentifier(&NSString::from_str(bundle_id))
        else {
            warn!(bundle = bundle_id, "no application url for bundle id");
            return;
        };
        info!(bundle = bundle_id, "launching");
        let config = NSWorkspaceOpenConfiguration::new();
        config.setActivates(true);
        let bundle = bundle_id.to_string();
        let completion = block2::StackBlock::new(
            move |app: *mut NSRunningApplication, error: *mut objc2_foundation::NSError| {
                if app.is_null() {
                    warn!(bundle = %bundle, has_error = !error.is_null(), "launch failed");
                } else {
                    debug!(bundle = %bundle, "launch completed");
                }
            },
        )
        .copy();
        ws.openApplicationAtURL_configuration_completionHandler(&url, &config, Some(&completion));
    }
}
