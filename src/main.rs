use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{DateTime, Duration, Utc};
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use retention_ai::config::AppConfig;
use retention_ai::error::AppError;
use retention_ai::telemetry;
use retention_ai::workflows::refunds::{
    refund_router, CustomerId, CustomerRecord, PurchaseId, PurchaseRecord, RefundDecision,
    RefundEngine, RefundReason,
};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Retention Decision Service",
    about = "Serve or demo the refund and retention decision engine",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate refund scenarios from the command line
    Refund {
        #[command(subcommand)]
        command: RefundCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum RefundCommand {
    /// Evaluate a single refund request and print the decision
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Purchase identifier
    #[arg(long, default_value = "demo-purchase")]
    purchase_id: String,
    /// Units purchased
    #[arg(long)]
    total_units: u64,
    /// Units consumed so far
    #[arg(long, default_value_t = 0)]
    consumed_units: u64,
    /// Price paid, in account currency
    #[arg(long)]
    price_paid: f64,
    /// Purchase instant (RFC 3339); wins over --hours-since-purchase
    #[arg(long, value_parser = parse_instant)]
    purchased_at: Option<DateTime<Utc>>,
    /// Hours elapsed since purchase (default 0)
    #[arg(long, default_value_t = 0.0)]
    hours_since_purchase: f64,
    /// Customer identifier
    #[arg(long, default_value = "demo-customer")]
    customer_id: String,
    /// Customer lifetime value, in account currency
    #[arg(long, default_value_t = 0.0)]
    lifetime_value: f64,
    /// Refund reason code (unused, technical_issue, quality_issue,
    /// first_time_user, bulk_unused)
    #[arg(long)]
    reason: String,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Refund {
            command: RefundCommand::Evaluate(args),
        } => run_refund_evaluate(args),
    }
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as RFC 3339 ({err})"))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let engine = Arc::new(RefundEngine::new(config.policy.clone()));
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(refund_router(engine))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "retention decision service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn run_refund_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let now = Utc::now();
    let purchased_at = args.purchased_at.unwrap_or_else(|| {
        now - Duration::milliseconds((args.hours_since_purchase * 3_600_000.0) as i64)
    });

    let purchase = PurchaseRecord {
        id: PurchaseId(args.purchase_id),
        total_units: args.total_units,
        consumed_units: args.consumed_units,
        price_paid: args.price_paid,
        purchased_at,
    };
    let customer = CustomerRecord {
        id: CustomerId(args.customer_id),
        lifetime_value: args.lifetime_value,
    };

    let engine = RefundEngine::default();
    let decision = match RefundReason::from_code(&args.reason) {
        Some(reason) => engine.evaluate(&purchase, &customer, reason, now)?,
        None => {
            warn!(code = %args.reason, "unrecognized refund reason code, applying fallback base rate");
            engine.evaluate_unrecognized(&purchase, &customer, now)?
        }
    };

    render_decision(&purchase, &decision);
    Ok(())
}

fn render_decision(purchase: &PurchaseRecord, decision: &RefundDecision) {
    println!("Refund evaluation");
    println!(
        "Purchase {}: {}/{} units consumed, ${:.2} paid",
        decision.purchase_id.0, purchase.consumed_units, purchase.total_units, purchase.price_paid
    );
    match decision.reason {
        Some(reason) => println!("Reason: {}", reason.code()),
        None => println!("Reason: unrecognized (fallback rate applied)"),
    }

    let status = if decision.approved {
        "approved"
    } else {
        "not approved"
    };
    println!(
        "Final rate: {:.1}% -> refund ${:.2} ({status})",
        decision.final_rate * 100.0,
        decision.refund_amount
    );
    println!(
        "Recommendation: {} ({})",
        decision.recommendation.as_str(),
        decision.recommendation.summary()
    );

    if decision.alternatives.is_empty() {
        println!("Alternatives: none");
    } else {
        println!("Alternatives:");
        for offer in &decision.alternatives {
            println!("  - {}", offer.description);
        }
    }

    println!("Adjustments:");
    for entry in &decision.adjustments {
        println!(
            "  - {:?} x{:.2} -> {:.4} ({})",
            entry.stage, entry.multiplier, entry.rate_after, entry.notes
        );
    }
}
