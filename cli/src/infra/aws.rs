//! AWS client construction.

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;

/// Region and optional static credentials for one invocation.
#[derive(Debug, Clone)]
pub struct AwsSettings {
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// The service clients install and uninstall need.
#[derive(Debug, Clone)]
pub struct AwsClients {
    pub cloudformation: aws_sdk_cloudformation::Client,
    pub s3: aws_sdk_s3::Client,
}

impl AwsClients {
    /// Load the shared SDK config and build both clients.
    ///
    /// Static credentials are used only when both halves are given; the
    /// default provider chain (profile, SSO, instance role) applies otherwise.
    pub async fn connect(settings: &AwsSettings) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(settings.region.clone()));
        if let (Some(id), Some(secret)) = (&settings.access_key_id, &settings.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                id.as_str(),
                secret.as_str(),
                None,
                None,
                "aws-install",
            ));
        } else {
            tracing::debug!("using default AWS credential chain");
        }
        let shared = loader.load().await;
        Self {
            cloudformation: aws_sdk_cloudformation::Client::new(&shared),
            s3: aws_sdk_s3::Client::new(&shared),
        }
    }
}
