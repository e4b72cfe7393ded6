//! HTTP handlers, one module per concern, plus the shared application state.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::services::{ProductService, RfqService, ShipmentService, TradingStepService};

pub mod products;
pub mod rfq;
pub mod shipments;
pub mod tracking;
pub mod trading_steps;

/// All services, constructed once at startup over a shared pool.
#[derive(Clone)]
pub struct AppServices {
    pub shipments: ShipmentService,
    pub trading: TradingStepService,
    pub products: ProductService,
    pub rfq: RfqService,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self {
            shipments: ShipmentService::new(db.clone()),
            trading: TradingStepService::new(db.clone()),
            products: ProductService::new(db.clone()),
            rfq: RfqService::new(db),
        }
    }
}

/// Shared application state passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: Arc<AppConfig>,
    pub services: AppServices,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: Arc<AppConfig>) -> Self {
        let services = AppServices::new(db.clone());
        Self {
            db,
            config,
            services,
        }
    }

    pub fn shipments(&self) -> &ShipmentService {
        &self.services.shipments
    }

    pub fn trading(&self) -> &TradingStepService {
        &self.services.trading
    }

    pub fn products(&self) -> &ProductService {
        &self.services.products
    }

    pub fn rfq(&self) -> &RfqService {
        &self.services.rfq
    }
}
