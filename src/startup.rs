use crate::config::Config;
use crate::error::AppError;
use crate::handlers;
use crate::services::{MongoDb, OrderService};
use axum::{
    routing::{get, put},
    Router,
};
use secrecy::ExposeSecret;
use std::future::IntoFuture;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: MongoDb,
    pub orders: OrderService,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: Config) -> Result<Self, AppError> {
        let db = MongoDb::connect(
            config.database.url.expose_secret(),
            &config.database.db_name,
        )
        .await?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let orders = OrderService::new(&db);

        let state = AppState {
            config: config.clone(),
            db,
            orders,
        };

        let app = Router::new()
            .route("/health", get(handlers::health_check))
            .route(
                "/api/orders",
                get(handlers::orders::list_orders).post(handlers::orders::place_order),
            )
            .route(
                "/api/orders/:id",
                get(handlers::orders::get_order)
                    .put(handlers::orders::update_order)
                    .delete(handlers::orders::delete_order),
            )
            .route(
                "/api/rates",
                get(handlers::rates::list_rates).post(handlers::rates::upsert_rate),
            )
            .route(
                "/api/rates/:id",
                put(handlers::rates::update_rate).delete(handlers::rates::delete_rate),
            )
            .route(
                "/api/inventory",
                get(handlers::inventory::list_inventory).post(handlers::inventory::upsert_inventory),
            )
            .route(
                "/api/inventory/:id",
                get(handlers::inventory::get_inventory_item)
                    .put(handlers::inventory::update_inventory_item)
                    .delete(handlers::inventory::delete_inventory_item),
            )
            .route(
                "/api/ledgers",
                get(handlers::ledgers::list_ledgers).post(handlers::ledgers::add_ledger_entry),
            )
            .route(
                "/api/ledgers/:customer_number",
                get(handlers::ledgers::get_ledger),
            )
            .route(
                "/api/ledgers/:customer_number/:entry_id",
                put(handlers::ledgers::update_ledger_entry)
                    .delete(handlers::ledgers::delete_ledger_entry),
            )
            .route(
                "/api/staff",
                get(handlers::staff::list_staff).post(handlers::staff::create_staff),
            )
            .route(
                "/api/staff/:id",
                put(handlers::staff::update_staff).delete(handlers::staff::delete_staff),
            )
            .route(
                "/api/wholesaler",
                get(handlers::wholesaler::list_purchases).post(handlers::wholesaler::create_purchase),
            )
            .route(
                "/api/wholesaler/:id",
                put(handlers::wholesaler::update_purchase)
                    .delete(handlers::wholesaler::delete_purchase),
            )
            // The dashboard is served from a separate origin.
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state.clone());

        // port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn db(&self) -> &MongoDb {
        &self.state.db
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
