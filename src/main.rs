use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gajian::config::{Config, DatabaseConfig};
use gajian::modules::attendance::MySqlAttendanceRepository;
use gajian::modules::contributions::BpjsContributionCalculator;
use gajian::modules::employees::MySqlEmployeeRepository;
use gajian::modules::health;
use gajian::modules::loans::{self, LoanLedger, MySqlLoanRepository};
use gajian::modules::payroll::{self, MySqlPayrollRepository, PayslipOrchestrator};
use gajian::modules::thr::{self, ThrService};
use gajian::modules::withholding::Pph21Calculator;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("gajian={},actix_web=info", config.app.log_level).into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.app.env == "production" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(
        env = config.app.env.as_str(),
        bind = config.server.bind_address().as_str(),
        overtime_enabled = config.payroll.overtime_enabled,
        rates_file = ?config.payroll.rates_file,
        "Starting Gajian payroll engine"
    );

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;
    DatabaseConfig::run_migrations(&db_pool)
        .await
        .context("Failed to run migrations")?;

    tracing::info!(
        max_connections = config.database.max_connections,
        "Database pool initialized"
    );

    let statutory = config.payroll.statutory.clone();
    let employees = Arc::new(MySqlEmployeeRepository::new(db_pool.clone()));
    let loan_ledger = LoanLedger::new(Arc::new(MySqlLoanRepository::new(db_pool.clone())));
    let thr_service = ThrService::new(employees.clone());
    let orchestrator = Arc::new(PayslipOrchestrator::new(
        employees,
        Arc::new(MySqlAttendanceRepository::new(db_pool.clone())),
        loan_ledger.clone(),
        Arc::new(MySqlPayrollRepository::new(db_pool.clone())),
        Arc::new(BpjsContributionCalculator::new(statutory.contributions)),
        Arc::new(Pph21Calculator::new(statutory.withholding)),
        config.payroll.settings(),
    ));

    // Start HTTP server
    let bind_address = config.server.bind_address();
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(orchestrator.clone()))
            .app_data(web::Data::new(loan_ledger.clone()))
            .app_data(web::Data::new(thr_service.clone()))
            .configure(health::controllers::configure)
            .service(
                web::scope("/api")
                    .configure(payroll::controllers::configure)
                    .configure(thr::controllers::configure)
                    .configure(loans::controllers::configure),
            )
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
