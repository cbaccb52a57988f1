//! The "add app" wizard.

use super::models::{
    AppPlatform, CreateAndroidAppRequest, CreateIosAppRequest, CreateWebAppRequest,
    FirebaseAppInfo, ShaCertificate,
};
use super::FirebaseApps;
use crate::core::ConsoleError;
use crate::flow::{Flow, FlowState, RetryOutcome};
use crate::operation::OperationSource;
use crate::orchestrator::Step;
use crate::state::ErrorCause;
use crate::wizard::validation::{
    is_present, is_valid_android_package, is_valid_ios_bundle_id, is_valid_sha_certificate,
};
use crate::wizard::{Transition, WizardStep};
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub const STEP_PLATFORM: usize = 0;
pub const STEP_DETAILS: usize = 1;
pub const STEP_REVIEW: usize = 2;

/// Index of the registration step in the remote sequence.
const REGISTER_STEP: usize = 1;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppDraft {
    pub platform: AppPlatform,
    pub display_name: String,
    pub package_name: String,
    pub bundle_id: String,
    pub app_store_id: String,
    pub sha_certificate: String,
}

impl AppDraft {
    pub fn with_platform(self, platform: AppPlatform) -> Self {
        Self { platform, ..self }
    }

    pub fn with_display_name(self, display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..self
        }
    }

    pub fn with_package_name(self, package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            ..self
        }
    }

    pub fn with_bundle_id(self, bundle_id: impl Into<String>) -> Self {
        Self {
            bundle_id: bundle_id.into(),
            ..self
        }
    }

    pub fn with_app_store_id(self, app_store_id: impl Into<String>) -> Self {
        Self {
            app_store_id: app_store_id.into(),
            ..self
        }
    }

    pub fn with_sha_certificate(self, fingerprint: impl Into<String>) -> Self {
        Self {
            sha_certificate: fingerprint.into(),
            ..self
        }
    }

    fn display_name(&self) -> Option<String> {
        is_present(&self.display_name).then(|| self.display_name.trim().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateAppError {
    EmptyPackageName,
    InvalidPackageName,
    EmptyBundleId,
    InvalidBundleId,
    EmptyDisplayName,
    InvalidShaCertificate,
    NoConnection,
    RegisterAppFailed,
    AddShaCertificateFailed,
}

impl ErrorCause for CreateAppError {
    fn no_connection() -> Self {
        CreateAppError::NoConnection
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            CreateAppError::NoConnection
                | CreateAppError::RegisterAppFailed
                | CreateAppError::AddShaCertificateFailed
        )
    }

    fn default_message(&self) -> String {
        match self {
            CreateAppError::EmptyPackageName => "Enter the Android package name",
            CreateAppError::InvalidPackageName => "Enter a package name like com.company.app",
            CreateAppError::EmptyBundleId => "Enter the Apple bundle ID",
            CreateAppError::InvalidBundleId => "Enter a bundle ID like com.company.app",
            CreateAppError::EmptyDisplayName => "Enter an app nickname",
            CreateAppError::InvalidShaCertificate => "Enter a SHA-1 or SHA-256 fingerprint",
            CreateAppError::NoConnection => "No connection",
            CreateAppError::RegisterAppFailed => "Could not register the app",
            CreateAppError::AddShaCertificateFailed => "Could not add the SHA certificate",
        }
        .to_string()
    }
}

fn validate_details(draft: &AppDraft) -> Result<(), CreateAppError> {
    match draft.platform {
        AppPlatform::Android => {
            if !is_present(&draft.package_name) {
                return Err(CreateAppError::EmptyPackageName);
            }
            if !is_valid_android_package(&draft.package_name) {
                return Err(CreateAppError::InvalidPackageName);
            }
            if is_present(&draft.sha_certificate) && !is_valid_sha_certificate(&draft.sha_certificate) {
                return Err(CreateAppError::InvalidShaCertificate);
            }
        }
        AppPlatform::Ios => {
            if !is_present(&draft.bundle_id) {
                return Err(CreateAppError::EmptyBundleId);
            }
            if !is_valid_ios_bundle_id(&draft.bundle_id) {
                return Err(CreateAppError::InvalidBundleId);
            }
        }
        AppPlatform::Web => {
            if !is_present(&draft.display_name) {
                return Err(CreateAppError::EmptyDisplayName);
            }
        }
    }
    Ok(())
}

pub type CreateAppState = FlowState<AppDraft, CreateAppError>;

struct AppRemote {
    apps: FirebaseApps,
    operations: Arc<dyn OperationSource>,
    project_id: String,
}

impl AppRemote {
    fn steps<'a>(&'a self, draft: &'a AppDraft) -> Vec<Step<'a, CreateAppError>> {
        let apps = &self.apps;
        let project_id = self.project_id.as_str();

        let mut steps = vec![
            Step::local("Validate", move || validate_details(draft)),
            Step::operation(
                "Register app",
                CreateAppError::RegisterAppFailed,
                self.operations.clone(),
                move |_| match draft.platform {
                    AppPlatform::Android => {
                        let request = CreateAndroidAppRequest {
                            package_name: draft.package_name.trim().to_string(),
                            display_name: draft.display_name(),
                        };
                        async move { apps.create_android_app(project_id, &request).await }.boxed()
                    }
                    AppPlatform::Ios => {
                        let request = CreateIosAppRequest {
                            bundle_id: draft.bundle_id.trim().to_string(),
                            display_name: draft.display_name(),
                            app_store_id: is_present(&draft.app_store_id)
                                .then(|| draft.app_store_id.trim().to_string()),
                        };
                        async move { apps.create_ios_app(project_id, &request).await }.boxed()
                    }
                    AppPlatform::Web => {
                        let request = CreateWebAppRequest {
                            display_name: draft.display_name.trim().to_string(),
                        };
                        async move { apps.create_web_app(project_id, &request).await }.boxed()
                    }
                },
            ),
        ];

        if draft.platform == AppPlatform::Android && is_present(&draft.sha_certificate) {
            steps.push(Step::call(
                "Add SHA certificate",
                CreateAppError::AddShaCertificateFailed,
                move |results| {
                    let app_id = results.response_field(REGISTER_STEP, "appId");
                    let certificate = ShaCertificate::from_fingerprint(&draft.sha_certificate);
                    async move {
                        let app_id = app_id.ok_or_else(|| {
                            ConsoleError::ApiError("registered app has no appId".to_string())
                        })?;
                        apps.add_sha_certificate(project_id, &app_id, &certificate)
                            .await?;
                        Ok::<(), ConsoleError>(())
                    }
                    .boxed()
                },
            ));
        }

        steps
    }
}

/// Wizard registering an app in an existing project: platform, details, review.
pub struct CreateAppFlow {
    remote: AppRemote,
    flow: Flow<AppDraft, CreateAppError>,
}

impl CreateAppFlow {
    pub fn new(apps: FirebaseApps, project_id: impl Into<String>) -> Self {
        let remote = AppRemote {
            operations: Arc::new(apps.operations()),
            apps,
            project_id: project_id.into(),
        };
        let flow = Flow::new(
            AppDraft::default(),
            vec![
                WizardStep::unchecked("Platform"),
                WizardStep::new("App details", validate_details),
                WizardStep::unchecked("Review"),
            ],
        );
        Self { remote, flow }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.flow = self.flow.with_poll_interval(interval);
        self
    }

    pub fn project_id(&self) -> &str {
        &self.remote.project_id
    }

    pub fn subscribe(&self) -> watch::Receiver<CreateAppState> {
        self.flow.subscribe()
    }

    pub fn snapshot(&self) -> CreateAppState {
        self.flow.snapshot()
    }

    pub fn edit(&mut self, update: impl FnOnce(AppDraft) -> AppDraft) {
        self.flow.edit(update);
    }

    /// Moves to the next page; leaving the review page registers the app.
    pub async fn next(&mut self) -> Transition {
        let transition = self.flow.forward();
        if transition == Transition::Finished {
            let draft = self.flow.draft().clone();
            let steps = self.remote.steps(&draft);
            self.flow.run(&steps).await;
        }
        transition
    }

    pub fn back(&mut self) -> Transition {
        self.flow.back()
    }

    pub fn dismiss_error(&mut self) {
        self.flow.dismiss_error();
    }

    pub async fn retry(&mut self) -> RetryOutcome {
        let draft = self.flow.draft().clone();
        let steps = self.remote.steps(&draft);
        self.flow.retry(&steps).await
    }

    /// The app created by the registration step, once it has finished.
    pub fn registered_app(&self) -> Option<FirebaseAppInfo> {
        self.flow
            .orchestrator()
            .results()
            .get(REGISTER_STEP)
            .and_then(|operation| operation.response_as().ok().flatten())
    }
}
