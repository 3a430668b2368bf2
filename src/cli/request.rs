use std::{io::Write, path::PathBuf, sync::Arc};

use stream_connector::{
    connector::{Connector, ConnectorConfig, HttpConnector, HttpsConnector},
    http::{HttpCommon, HttpRequest, HttpResponse},
    resolver::IpFamily,
    session::{HttpSession, SessionFactory},
};
use tracing::{info, warn};

use super::{load_config, CliResult, TargetUrl};

pub struct RequestOptions {
    pub workers: u32,
    pub requests: u32,
    pub method: String,
    pub data: Option<String>,
    pub ip_family: Option<IpFamily>,
    pub config: Option<PathBuf>,
    pub tls_domain: Option<String>,
    pub insecure: bool,
}

/// Build the connector settings for `url`, starting from the config file if any.
pub fn build_config(url: &TargetUrl, opts: &RequestOptions) -> CliResult<ConnectorConfig> {
    let mut config = match &opts.config {
        Some(path) => load_config(path)?,
        None => ConnectorConfig::with_target("", ""),
    };
    config.host = url.get_hostname().to_string();
    config.port = url.get_port().to_string();
    if let Some(family) = opts.ip_family {
        config.ip_family = family;
    }
    if opts.tls_domain.is_some() {
        config.tls_domain = opts.tls_domain.clone();
    }
    config.tls_insecure |= opts.insecure;
    Ok(config)
}

pub fn build_request(url: &TargetUrl, opts: &RequestOptions) -> HttpRequest {
    let request = HttpRequest::new(&opts.method, url.get_tail(), "HTTP/1.1")
        .add_header_kv("Host", url.get_host())
        .add_header("Accept: */*")
        .add_header("User-Agent: stream-connector")
        .add_header_option(url.get_authorization());
    match &opts.data {
        Some(data) => request
            .add_header("Content-Type: application/json")
            .add_payload(data.as_bytes()),
        None => request,
    }
}

fn print_response(worker: u32, response: &HttpResponse) -> CliResult<()> {
    let mut out = std::io::stdout().lock();
    writeln!(
        out,
        "[{}] {} {} {}",
        worker,
        response.get_version(),
        response.get_status(),
        response.get_text()
    )?;
    for line in response.get_headers().iter() {
        writeln!(out, "{}", line)?;
    }
    writeln!(out)?;
    out.write_all(response.get_payload())?;
    writeln!(out)?;
    Ok(())
}

/// Give each worker its own session and send some requests over it.
async fn run_worker<F>(
    worker: u32,
    connector: Arc<Connector<F>>,
    request: HttpRequest,
    requests: u32,
) -> CliResult<()>
where
    F: SessionFactory<Session = HttpSession>,
{
    let mut session = connector.acquire_default().await?;
    info!(worker, peer = %session.peer_addr(), "session established");

    for _ in 0..requests {
        let response = session.perform(&request).await?;
        print_response(worker, &response)?;
    }
    Ok(())
}

async fn start_workers<F>(
    connector: Connector<F>,
    request: HttpRequest,
    opts: &RequestOptions,
) -> u32
where
    F: SessionFactory<Session = HttpSession>,
{
    let connector = Arc::new(connector);

    let tasks: Vec<_> = (0..opts.workers)
        .map(|worker| {
            let task = run_worker(worker, connector.clone(), request.clone(), opts.requests);
            tokio::spawn(task)
        })
        .collect();

    let mut failures = 0;
    for (worker, task) in tasks.into_iter().enumerate() {
        match task.await {
            Ok(Ok(())) => (),
            Ok(Err(e)) => {
                warn!(worker, error = %e, "worker failed");
                failures += 1;
            }
            Err(e) => {
                warn!(worker, error = %e, "worker panicked");
                failures += 1;
            }
        }
    }

    if let Ok(connector) = Arc::try_unwrap(connector) {
        connector.shutdown().await;
    }
    failures
}

/// Run the request command, returning the number of failed workers.
pub async fn run_requests(url: TargetUrl, opts: RequestOptions) -> CliResult<u32> {
    let config = build_config(&url, &opts)?;
    let request = build_request(&url, &opts);
    info!(target_addr = %config.target(), https = url.is_https(), "starting workers");

    let proto = url.get_proto();
    if url.is_https() {
        let connector = HttpsConnector::from_config(config)?;
        Ok(start_workers(connector, request, &opts).await)
    } else if proto.eq_ignore_ascii_case("http") {
        let connector = HttpConnector::from_config(config)?;
        Ok(start_workers(connector, request, &opts).await)
    } else {
        let message = format!("unsupported protocol {:?}, expected http or https", proto);
        Err(message.into())
    }
}
