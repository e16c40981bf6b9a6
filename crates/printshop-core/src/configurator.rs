//! Configurator façade.
//!
//! The single entry point a UI drives. Mutations are synchronous and return
//! an optional [`QuoteTask`]: whenever a mutation leaves the selection
//! complete, a quote is started and the task that performs the pricing call
//! is handed back for the UI to run or spawn.

use crate::catalog::{CatalogIndex, OptionLevel, OptionLevels, SizeOption, SubOption};
use crate::handoff::FinalizedSelection;
use crate::ids::{OptionId, ProductTypeId, SessionId};
use crate::pricing::{PriceQuote, PriceResolver, PriceStatus, QuoteTask};
use crate::selection::{Selection, SelectionMachine, SelectionStage};
use crate::ConfiguratorError;
use std::sync::Arc;

/// One configuration session (one open wizard).
pub struct Configurator {
    session: SessionId,
    catalog: Arc<CatalogIndex>,
    machine: SelectionMachine,
    resolver: PriceResolver,
}

impl Configurator {
    pub fn new(catalog: Arc<CatalogIndex>, resolver: PriceResolver) -> Self {
        let session = SessionId::generate();
        tracing::debug!(%session, "configurator session started");
        Self {
            session,
            catalog,
            machine: SelectionMachine::new(),
            resolver,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        self.machine.selection()
    }

    pub fn stage(&self) -> SelectionStage {
        self.machine.stage()
    }

    pub fn is_complete(&self) -> bool {
        self.machine.is_complete()
    }

    // === Mutations ===

    pub fn select_product_type(
        &mut self,
        id: &ProductTypeId,
    ) -> Result<Option<QuoteTask>, ConfiguratorError> {
        let product_type = self
            .catalog
            .product_type(id)
            .cloned()
            .ok_or_else(|| ConfiguratorError::UnknownProductType(id.to_string()))?;

        self.machine.set_product_type(product_type);
        self.resolver.invalidate();
        tracing::debug!(session = %self.session, product_type = %id, "product type selected");
        self.quote_if_complete()
    }

    pub fn select_level1(&mut self, id: &OptionId) -> Result<Option<QuoteTask>, ConfiguratorError> {
        let option = self.lookup_option(OptionLevel::One, id)?;
        self.machine.set_level1(option)?;
        self.resolver.invalidate();
        tracing::debug!(session = %self.session, option = %id, "level 1 option selected");
        self.quote_if_complete()
    }

    pub fn select_level2(&mut self, id: &OptionId) -> Result<Option<QuoteTask>, ConfiguratorError> {
        let option = self.lookup_option(OptionLevel::Two, id)?;
        self.machine.set_level2(option)?;
        self.resolver.invalidate();
        tracing::debug!(session = %self.session, option = %id, "level 2 option selected");
        self.quote_if_complete()
    }

    /// Select a size by dimensions, in either orientation.
    ///
    /// Sizes outside the catalog's list are accepted if the product's
    /// envelope admits them.
    pub fn select_size(
        &mut self,
        width: f64,
        height: f64,
    ) -> Result<Option<QuoteTask>, ConfiguratorError> {
        let requested = SizeOption::new(width, height)?;
        let size = self
            .available_sizes()
            .into_iter()
            .find(|s| s.matches(width, height))
            .unwrap_or(requested);

        let stored = self.machine.set_size(size)?;
        self.resolver.invalidate();
        tracing::debug!(session = %self.session, size = %stored, "size selected");
        self.quote_if_complete()
    }

    /// Set the quantity. A pending or resolved quote for the same item is
    /// kept; otherwise a complete selection is (re)quoted.
    pub fn set_quantity(&mut self, quantity: i64) -> Result<Option<QuoteTask>, ConfiguratorError> {
        self.machine.set_quantity(quantity)?;
        self.resolver.retag(self.machine.selection());
        tracing::debug!(session = %self.session, quantity, "quantity set");

        let quote = self.resolver.current();
        let still_valid = quote.is_for(self.machine.selection())
            && matches!(
                quote.status,
                PriceStatus::Pending | PriceStatus::Resolved { .. }
            );
        if still_valid {
            return Ok(None);
        }
        self.quote_if_complete()
    }

    /// Request a quote for the current selection, e.g. to retry a failure.
    pub fn request_quote(&self) -> Result<QuoteTask, ConfiguratorError> {
        self.resolver.request_quote(self.machine.selection())
    }

    /// Select levels that offer exactly one option.
    ///
    /// A UI policy helper; the state machine never advances on its own.
    pub fn auto_select_single_options(&mut self) -> Result<Option<QuoteTask>, ConfiguratorError> {
        let mut task = None;
        if self.selection().level1.is_none() {
            if let [only] = self.available_level1_options().as_slice() {
                task = self.select_level1(&only.id.clone())?;
            }
        }
        if self.selection().level1.is_some() && self.selection().level2.is_none() {
            if let [only] = self.available_level2_options().as_slice() {
                task = self.select_level2(&only.id.clone())?;
            }
        }
        Ok(task)
    }

    pub fn reset(&mut self) {
        self.machine.reset();
        self.resolver.invalidate();
        tracing::debug!(session = %self.session, "selection reset");
    }

    // === Queries ===

    /// Level-1 options for the chosen product type; empty when none apply.
    pub fn available_level1_options(&self) -> Vec<SubOption> {
        match &self.selection().product_type {
            Some(pt) if pt.option_levels >= OptionLevels::One => self
                .catalog
                .sub_options(&pt.id, OptionLevel::One, None)
                .to_vec(),
            _ => Vec::new(),
        }
    }

    /// Level-2 options offered under the chosen level-1 option.
    pub fn available_level2_options(&self) -> Vec<SubOption> {
        let selection = self.selection();
        match (&selection.product_type, &selection.level1) {
            (Some(pt), Some(level1)) if pt.option_levels == OptionLevels::Two => self
                .catalog
                .sub_options(&pt.id, OptionLevel::Two, Some(&level1.id))
                .to_vec(),
            _ => Vec::new(),
        }
    }

    /// Sizes that fit the chosen product type; empty until all required
    /// levels are chosen.
    pub fn available_sizes(&self) -> Vec<SizeOption> {
        let selection = self.selection();
        match &selection.product_type {
            Some(pt) if selection.levels_complete() => self.catalog.sizes_for(pt),
            _ => Vec::new(),
        }
    }

    pub fn current_quote(&self) -> PriceQuote {
        self.resolver.current()
    }

    /// Hand the completed, priced selection off to checkout.
    pub fn finalize(&self) -> Result<FinalizedSelection, ConfiguratorError> {
        let selection = self.machine.selection();
        if !selection.is_complete() {
            return Err(ConfiguratorError::IncompleteSelection(
                selection.missing().join(", "),
            ));
        }

        let quote = self.resolver.current();
        let unit_price = match (&quote.status, quote.is_for(selection)) {
            (PriceStatus::Resolved { unit_price }, true) => *unit_price,
            _ => {
                return Err(ConfiguratorError::IncompleteSelection(
                    "resolved price".to_string(),
                ))
            }
        };

        let line = FinalizedSelection::new(selection, unit_price)?;
        tracing::info!(
            session = %self.session,
            product_type = %line.product_type_id,
            quantity = line.quantity,
            total = %line.total,
            "selection finalized"
        );
        Ok(line)
    }

    fn lookup_option(
        &self,
        level: OptionLevel,
        id: &OptionId,
    ) -> Result<SubOption, ConfiguratorError> {
        let action = match level {
            OptionLevel::One => "select level 1 option",
            OptionLevel::Two => "select level 2 option",
        };
        let selection = self.selection();
        let product_type = selection
            .product_type
            .as_ref()
            .ok_or_else(|| ConfiguratorError::transition(action, "no product type selected"))?;

        let parent = match level {
            OptionLevel::One => None,
            OptionLevel::Two => Some(
                selection
                    .level1
                    .as_ref()
                    .map(|o| &o.id)
                    .ok_or_else(|| {
                        ConfiguratorError::transition(action, "no level 1 option selected")
                    })?,
            ),
        };

        if product_type.option_levels.count() < level.number() {
            return Err(ConfiguratorError::transition(
                action,
                format!("{} has no {} options", product_type.name, level),
            ));
        }

        self.catalog
            .sub_option(&product_type.id, level, parent, id)
            .cloned()
            .ok_or_else(|| ConfiguratorError::UnknownOption {
                level,
                id: id.to_string(),
            })
    }

    fn quote_if_complete(&self) -> Result<Option<QuoteTask>, ConfiguratorError> {
        if !self.machine.is_complete() {
            return Ok(None);
        }
        self.resolver
            .request_quote(self.machine.selection())
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        standard_sizes, EnvelopeRecord, InMemoryCatalog, ProductTypeRecord, SubOptionRecord,
    };
    use crate::error::PricingFailure;
    use crate::pricing::{PriceRequest, PriceResponse, PricingSource};
    use async_trait::async_trait;
    use std::time::Duration;

    struct EchoPrice;

    #[async_trait]
    impl PricingSource for EchoPrice {
        async fn quote(&self, request: &PriceRequest) -> Result<PriceResponse, PricingFailure> {
            Ok(PriceResponse {
                retail_price: request.width + request.height,
                currency: "USD".to_string(),
            })
        }
    }

    async fn configurator() -> Configurator {
        let envelope = EnvelopeRecord {
            min_w: 8.0,
            max_w: 30.0,
            min_h: 10.0,
            max_h: 30.0,
        };
        let source = InMemoryCatalog::new()
            .with_product_type(ProductTypeRecord {
                id: "paper".into(),
                name: "Fine Art Paper".into(),
                option_level_count: 1,
                envelope,
            })
            .with_product_type(ProductTypeRecord {
                id: "framed".into(),
                name: "Framed Print".into(),
                option_level_count: 2,
                envelope,
            })
            .with_options(
                "paper",
                OptionLevel::One,
                None,
                vec![SubOptionRecord::new("matte", "Matte", "finish")],
            )
            .with_options(
                "framed",
                OptionLevel::One,
                None,
                vec![
                    SubOptionRecord::new("depth-075", "0.75in", "frame_depth"),
                    SubOptionRecord::new("depth-150", "1.5in", "frame_depth"),
                ],
            )
            .with_options(
                "framed",
                OptionLevel::Two,
                Some("depth-075"),
                vec![SubOptionRecord::new("black", "Black", "frame_color")],
            );
        let catalog = CatalogIndex::load(&source, &standard_sizes()).await.unwrap();
        let resolver = PriceResolver::new(Arc::new(EchoPrice), Duration::from_secs(1));
        Configurator::new(Arc::new(catalog), resolver)
    }

    #[tokio::test]
    async fn test_unknown_ids() {
        let mut c = configurator().await;
        assert_eq!(
            c.select_product_type(&"nope".into()).unwrap_err().kind(),
            "unknown_product_type"
        );
        c.select_product_type(&"paper".into()).unwrap();
        assert_eq!(
            c.select_level1(&"gloss".into()).unwrap_err(),
            ConfiguratorError::UnknownOption {
                level: OptionLevel::One,
                id: "gloss".into()
            }
        );
    }

    #[tokio::test]
    async fn test_level2_options_scoped_to_level1() {
        let mut c = configurator().await;
        c.select_product_type(&"framed".into()).unwrap();
        assert!(c.available_level2_options().is_empty());

        c.select_level1(&"depth-150".into()).unwrap();
        assert!(c.available_level2_options().is_empty());
        assert!(matches!(
            c.select_level2(&"black".into()),
            Err(ConfiguratorError::UnknownOption { .. })
        ));

        c.select_level1(&"depth-075".into()).unwrap();
        assert_eq!(c.available_level2_options().len(), 1);
        c.select_level2(&"black".into()).unwrap();
        assert_eq!(c.stage(), SelectionStage::Level2Chosen);
    }

    #[tokio::test]
    async fn test_sizes_require_levels() {
        let mut c = configurator().await;
        assert!(c.available_sizes().is_empty());
        c.select_product_type(&"paper".into()).unwrap();
        assert!(c.available_sizes().is_empty());
        assert_eq!(
            c.select_size(16.0, 20.0).unwrap_err().kind(),
            "invalid_transition"
        );
        c.select_level1(&"matte".into()).unwrap();
        assert!(!c.available_sizes().is_empty());
    }

    #[tokio::test]
    async fn test_size_selection_triggers_quote() {
        let mut c = configurator().await;
        c.select_product_type(&"paper".into()).unwrap();
        assert!(c.select_level1(&"matte".into()).unwrap().is_none());

        let task = c.select_size(20.0, 16.0).unwrap().expect("quote started");
        assert!(c.current_quote().is_pending());
        assert_eq!(task.request().width, 16.0);
        task.run().await;
        assert_eq!(c.current_quote().unit_price().map(|m| m.amount_cents), Some(3600));
    }

    #[tokio::test]
    async fn test_invalid_size_dimensions() {
        let mut c = configurator().await;
        c.select_product_type(&"paper".into()).unwrap();
        c.select_level1(&"matte".into()).unwrap();
        assert_eq!(c.select_size(0.0, 10.0).unwrap_err().kind(), "invalid_size");
    }

    #[tokio::test]
    async fn test_auto_select_single_options() {
        let mut c = configurator().await;
        c.select_product_type(&"paper".into()).unwrap();
        assert!(c.auto_select_single_options().unwrap().is_none());
        assert_eq!(c.selection().level1.as_ref().unwrap().id.as_str(), "matte");

        c.select_product_type(&"framed".into()).unwrap();
        c.auto_select_single_options().unwrap();
        assert!(c.selection().level1.is_none());
        c.select_level1(&"depth-075".into()).unwrap();
        c.auto_select_single_options().unwrap();
        assert_eq!(c.selection().level2.as_ref().unwrap().id.as_str(), "black");
    }

    #[tokio::test]
    async fn test_finalize_requires_resolved_quote() {
        let mut c = configurator().await;
        c.select_product_type(&"paper".into()).unwrap();
        c.select_level1(&"matte".into()).unwrap();
        let task = c.select_size(16.0, 20.0).unwrap().unwrap();
        assert_eq!(
            c.finalize().unwrap_err(),
            ConfiguratorError::IncompleteSelection("resolved price".into())
        );
        task.run().await;
        assert!(c.finalize().is_ok());
    }

    #[tokio::test]
    async fn test_reset_clears_quote() {
        let mut c = configurator().await;
        c.select_product_type(&"paper".into()).unwrap();
        c.select_level1(&"matte".into()).unwrap();
        c.select_size(16.0, 20.0).unwrap().unwrap().run().await;
        c.reset();
        assert_eq!(c.stage(), SelectionStage::Empty);
        assert!(c.current_quote().is_idle());
    }
}
