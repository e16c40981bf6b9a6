//! End-to-end configurator flows against in-memory collaborators.

use async_trait::async_trait;
use parking_lot::Mutex;
use printshop_core::catalog::{
    standard_sizes, EnvelopeRecord, ProductTypeRecord, SizeRecord, SubOptionRecord,
};
use printshop_core::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

type Reply = Result<PriceResponse, PricingFailure>;

/// Pricing source whose replies are released by the test, keyed by size.
#[derive(Default)]
struct ScriptedPricing {
    pending: Mutex<HashMap<String, oneshot::Receiver<Reply>>>,
}

impl ScriptedPricing {
    fn expect(&self, size: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(size.to_string(), rx);
        tx
    }
}

#[async_trait]
impl PricingSource for ScriptedPricing {
    async fn quote(&self, request: &PriceRequest) -> Result<PriceResponse, PricingFailure> {
        let key = format!("{}x{}", request.width, request.height);
        let rx = self
            .pending
            .lock()
            .remove(&key)
            .ok_or_else(|| PricingFailure::ServerError(format!("unexpected request {}", key)))?;
        rx.await
            .unwrap_or_else(|_| Err(PricingFailure::NetworkError("dropped".into())))
    }
}

fn usd(amount: f64) -> Reply {
    Ok(PriceResponse {
        retail_price: amount,
        currency: "USD".to_string(),
    })
}

const ENVELOPE: EnvelopeRecord = EnvelopeRecord {
    min_w: 8.0,
    max_w: 30.0,
    min_h: 10.0,
    max_h: 30.0,
};

fn catalog_source() -> InMemoryCatalog {
    InMemoryCatalog::new()
        .with_product_type(ProductTypeRecord {
            id: "canvas075".into(),
            name: "Canvas 0.75in".into(),
            option_level_count: 0,
            envelope: ENVELOPE,
        })
        .with_product_type(ProductTypeRecord {
            id: "framed".into(),
            name: "Framed Canvas".into(),
            option_level_count: 2,
            envelope: ENVELOPE,
        })
        .with_sizes(
            "canvas075",
            vec![
                SizeRecord { width: 8.0, height: 10.0 },
                SizeRecord { width: 16.0, height: 20.0 },
                SizeRecord { width: 40.0, height: 60.0 },
            ],
        )
        .with_options(
            "framed",
            OptionLevel::One,
            None,
            vec![
                SubOptionRecord::new("A", "0.75in frame", "frame_depth"),
                SubOptionRecord::new("B", "1.5in frame", "frame_depth"),
            ],
        )
        .with_options(
            "framed",
            OptionLevel::Two,
            None,
            vec![
                SubOptionRecord::new("X", "Black", "frame_color"),
                SubOptionRecord::new("Y", "White", "frame_color"),
            ],
        )
}

async fn setup() -> (Configurator, Arc<ScriptedPricing>) {
    printshop_observability::init_test_logging();
    let catalog = CatalogIndex::load(&catalog_source(), &standard_sizes())
        .await
        .expect("catalog loads");
    let pricing = Arc::new(ScriptedPricing::default());
    let resolver = PriceResolver::new(pricing.clone(), Duration::from_secs(5));
    (Configurator::new(Arc::new(catalog), resolver), pricing)
}

#[tokio::test]
async fn test_canvas_sizes_filtered_by_envelope() {
    let (mut c, _) = setup().await;
    c.select_product_type(&"canvas075".into()).unwrap();

    let sizes = c.available_sizes();
    assert_eq!(
        sizes,
        vec![
            SizeOption::new(8.0, 10.0).unwrap(),
            SizeOption::new(16.0, 20.0).unwrap()
        ]
    );
    assert!(c.select_size(40.0, 60.0).is_err());
}

#[tokio::test]
async fn test_available_sizes_stay_inside_envelope() {
    let (mut c, _) = setup().await;
    c.select_product_type(&"framed".into()).unwrap();
    c.select_level1(&"A".into()).unwrap();
    c.select_level2(&"X".into()).unwrap();

    let sizes = c.available_sizes();
    assert!(!sizes.is_empty());
    for size in sizes {
        assert!((8.0..=30.0).contains(&size.width), "{}", size);
        assert!((10.0..=30.0).contains(&size.height), "{}", size);
    }
}

#[tokio::test]
async fn test_changing_level1_clears_level2_and_size() {
    let (mut c, pricing) = setup().await;
    c.select_product_type(&"framed".into()).unwrap();
    c.select_level1(&"A".into()).unwrap();
    c.select_level2(&"X".into()).unwrap();
    let _reply = pricing.expect("16x20");
    assert!(c.select_size(16.0, 20.0).unwrap().is_some());

    c.select_level1(&"B".into()).unwrap();
    let selection = c.selection();
    assert_eq!(selection.level1.as_ref().unwrap().id.as_str(), "B");
    assert!(selection.level2.is_none());
    assert!(selection.size.is_none());
    assert_eq!(c.stage(), SelectionStage::Level1Chosen);
    assert!(c.current_quote().is_idle());
}

#[tokio::test]
async fn test_level1_before_product_type_fails() {
    let (mut c, _) = setup().await;
    let err = c.select_level1(&"A".into()).unwrap_err();
    assert_eq!(err.kind(), "invalid_transition");
    assert_eq!(c.stage(), SelectionStage::Empty);
    assert_eq!(c.selection(), &Selection::default());
}

#[tokio::test]
async fn test_zero_level_product_goes_straight_to_size() {
    let (mut c, _) = setup().await;
    c.select_product_type(&"canvas075".into()).unwrap();
    assert!(c.available_level1_options().is_empty());
    assert!(c.select_size(16.0, 20.0).is_ok());
    assert!(c.is_complete());
}

#[tokio::test]
async fn test_complete_selection_resolves_quote() {
    let (mut c, pricing) = setup().await;
    c.select_product_type(&"canvas075".into()).unwrap();
    pricing.expect("16x20").send(usd(79.99)).unwrap();

    let task = c.select_size(16.0, 20.0).unwrap().expect("quote requested");
    assert!(c.current_quote().is_pending());
    assert!(task.run().await.is_applied());

    let quote = c.current_quote();
    assert_eq!(quote.unit_price(), Some(Money::new(7999, Currency::USD)));
    assert!(quote.is_for(c.selection()));
    assert_eq!(quote.selection.as_ref().unwrap().quantity, 1);
}

#[tokio::test]
async fn test_late_response_for_old_selection_is_discarded() {
    let (mut c, pricing) = setup().await;
    c.select_product_type(&"canvas075".into()).unwrap();
    let reply_a = pricing.expect("16x20");
    let reply_b = pricing.expect("8x10");

    let task_a = c.select_size(16.0, 20.0).unwrap().unwrap();
    let task_b = c.select_size(8.0, 10.0).unwrap().unwrap();
    let handle_a = tokio::spawn(task_a.run());
    let handle_b = tokio::spawn(task_b.run());

    reply_b.send(usd(49.99)).unwrap();
    assert!(handle_b.await.unwrap().is_applied());
    reply_a.send(usd(79.99)).unwrap();
    assert_eq!(handle_a.await.unwrap(), QuoteOutcome::Superseded);

    let quote = c.current_quote();
    assert_eq!(quote.unit_price(), Some(Money::new(4999, Currency::USD)));
    assert_eq!(
        quote.selection.as_ref().unwrap().size,
        Some(SizeOption::new(8.0, 10.0).unwrap())
    );
}

#[tokio::test]
async fn test_late_response_does_not_overwrite_pending_quote() {
    let (mut c, pricing) = setup().await;
    c.select_product_type(&"canvas075".into()).unwrap();
    let reply_a = pricing.expect("16x20");
    let _reply_b = pricing.expect("8x10");

    let task_a = c.select_size(16.0, 20.0).unwrap().unwrap();
    let _task_b = c.select_size(8.0, 10.0).unwrap().unwrap();

    reply_a.send(usd(79.99)).unwrap();
    assert_eq!(task_a.run().await, QuoteOutcome::Superseded);
    assert!(c.current_quote().is_pending());
}

#[tokio::test]
async fn test_finalize_requires_complete_selection() {
    let (mut c, pricing) = setup().await;
    assert_eq!(c.finalize().unwrap_err().kind(), "incomplete_selection");

    c.select_product_type(&"framed".into()).unwrap();
    assert_eq!(c.finalize().unwrap_err().kind(), "incomplete_selection");

    c.select_level1(&"A".into()).unwrap();
    assert_eq!(c.finalize().unwrap_err().kind(), "incomplete_selection");

    c.select_level2(&"Y".into()).unwrap();
    assert!(!c.is_complete());
    assert_eq!(c.finalize().unwrap_err().kind(), "incomplete_selection");

    pricing.expect("16x20").send(usd(120.0)).unwrap();
    c.select_size(16.0, 20.0).unwrap().unwrap().run().await;
    let line = c.finalize().unwrap();
    assert_eq!(line.level1_id, Some(OptionId::new("A")));
    assert_eq!(line.level2_id, Some(OptionId::new("Y")));
    assert_eq!(line.total, Money::new(12000, Currency::USD));
}

#[tokio::test]
async fn test_quantity_change_keeps_unit_price() {
    let (mut c, pricing) = setup().await;
    c.select_product_type(&"canvas075".into()).unwrap();
    pricing.expect("16x20").send(usd(79.99)).unwrap();
    c.select_size(16.0, 20.0).unwrap().unwrap().run().await;

    assert_eq!(
        c.set_quantity(0).unwrap_err(),
        ConfiguratorError::InvalidQuantity("0".into())
    );
    assert!(c.set_quantity(3).unwrap().is_none());
    assert_eq!(c.stage(), SelectionStage::Quantified);
    assert_eq!(
        c.current_quote().unit_price(),
        Some(Money::new(7999, Currency::USD))
    );

    let line = c.finalize().unwrap();
    assert_eq!(line.quantity, 3);
    assert_eq!(line.unit_price, Money::new(7999, Currency::USD));
    assert_eq!(line.total.display_amount(), "239.97");
}

#[tokio::test]
async fn test_failed_quote_can_be_retried() {
    let (mut c, pricing) = setup().await;
    c.select_product_type(&"canvas075".into()).unwrap();
    pricing
        .expect("16x20")
        .send(Err(PricingFailure::NoPriceForCombination))
        .unwrap();
    c.select_size(16.0, 20.0).unwrap().unwrap().run().await;
    assert_eq!(
        c.current_quote().failure(),
        Some(&PricingFailure::NoPriceForCombination)
    );
    assert!(c.finalize().is_err());

    pricing.expect("16x20").send(usd(79.99)).unwrap();
    assert!(c.request_quote().unwrap().run().await.is_applied());
    assert!(c.finalize().is_ok());
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let (mut first, pricing) = setup().await;
    let catalog = Arc::new(first.catalog().clone());
    let mut second = Configurator::new(
        catalog,
        PriceResolver::new(pricing.clone(), Duration::from_secs(5)),
    );
    assert_ne!(first.session_id(), second.session_id());

    first.select_product_type(&"canvas075".into()).unwrap();
    second.select_product_type(&"framed".into()).unwrap();
    pricing.expect("16x20").send(usd(79.99)).unwrap();
    first.select_size(16.0, 20.0).unwrap().unwrap().run().await;

    assert!(second.current_quote().is_idle());
    assert_eq!(second.stage(), SelectionStage::TypeChosen);
    assert!(first.finalize().is_ok());
}
