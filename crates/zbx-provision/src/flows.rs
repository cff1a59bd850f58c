//! End-to-end provisioning flows
//!
//! Each flow runs its steps strictly in order and stops at the first error.
//! Progress is reported through a caller-supplied callback so the console
//! layer decides how to render it.

use serde_json::Value;
use url::Url;
use zbx_api::{ApiSession, JsonRpcClient};
use zbx_core::ProvisionConfig;

use crate::availability::AvailabilityWait;
use crate::errors::ProvisionResult;
use crate::import::{import_configuration, TemplateDocument};
use crate::reconciler::{HostProvisioning, Reconciled, Reconciler};

#[derive(Debug)]
pub enum FlowEvent<'a> {
    WaitingForFrontend { url: &'a Url, max_attempts: u32 },
    FrontendAvailable { attempts: u32 },
    TemplateLoaded { document: &'a TemplateDocument },
    Authenticating { api_url: &'a Url, username: &'a str },
    Authenticated,
    Importing { document: &'a TemplateDocument },
    Imported,
    ResourceResolved(&'a Reconciled),
    TemplateResolved { name: &'a str, id: &'a str },
}

/// Poll the frontend base URL until it answers
pub async fn wait_for_frontend<F>(
    config: &ProvisionConfig,
    on_event: &mut F,
) -> ProvisionResult<u32>
where
    F: FnMut(FlowEvent<'_>),
{
    let url = config.api.base_url();
    on_event(FlowEvent::WaitingForFrontend {
        url,
        max_attempts: config.wait.max_attempts,
    });

    let attempts = AvailabilityWait::new(url.clone(), config.wait)?.wait().await?;
    on_event(FlowEvent::FrontendAvailable { attempts });
    Ok(attempts)
}

async fn connect<F>(config: &ProvisionConfig, on_event: &mut F) -> ProvisionResult<ApiSession>
where
    F: FnMut(FlowEvent<'_>),
{
    on_event(FlowEvent::Authenticating {
        api_url: config.api.api_url(),
        username: &config.api.credentials.username,
    });

    let session = JsonRpcClient::from_config(&config.api)?
        .login(&config.api.credentials, config.api.login_field)
        .await?;

    on_event(FlowEvent::Authenticated);
    Ok(session)
}

/// Wait, load the template document, authenticate, then import it.
///
/// The document is loaded before authenticating, so a missing file stops the
/// flow with no API call made.
pub async fn import_template<F>(
    config: &ProvisionConfig,
    mut on_event: F,
) -> ProvisionResult<Value>
where
    F: FnMut(FlowEvent<'_>),
{
    wait_for_frontend(config, &mut on_event).await?;

    let document = TemplateDocument::read(&config.template_path).await?;
    on_event(FlowEvent::TemplateLoaded {
        document: &document,
    });

    let session = connect(config, &mut on_event).await?;

    on_event(FlowEvent::Importing {
        document: &document,
    });
    let result = import_configuration(&session, &document).await?;
    on_event(FlowEvent::Imported);

    Ok(result)
}

/// Wait, authenticate, then ensure the configured host group and host exist
/// with the host linked to the configured template.
pub async fn ensure_host<F>(
    config: &ProvisionConfig,
    mut on_event: F,
) -> ProvisionResult<HostProvisioning>
where
    F: FnMut(FlowEvent<'_>),
{
    wait_for_frontend(config, &mut on_event).await?;
    let session = connect(config, &mut on_event).await?;

    let target = &config.host;
    let reconciler = Reconciler::new(&session);

    // Report each step as it resolves; nothing is rolled back on a later failure.
    let group = reconciler.ensure_host_group(&target.group_name).await?;
    on_event(FlowEvent::ResourceResolved(&group));

    let template_id = reconciler.require_template(&target.template_name).await?;
    on_event(FlowEvent::TemplateResolved {
        name: &target.template_name,
        id: &template_id,
    });

    let host = reconciler
        .ensure_agent_host(&target.host_name, &group.id, &template_id)
        .await?;
    on_event(FlowEvent::ResourceResolved(&host));

    Ok(HostProvisioning {
        group,
        template_id,
        host,
    })
}
