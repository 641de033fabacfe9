//! Reactive bindings between dashboard inputs and chart slots.
//!
//! Each [`Binding`] names an output slot, the inputs it depends on and the
//! handler that renders it. When an input changes, [`BindingTable::dispatch`]
//! runs exactly the handlers bound to that input, in registration order, and
//! returns one replacement figure per affected slot. The dataset is passed in
//! by reference on every call.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chart::{outcome_rate_figure, scatter_figure, Figure};
use crate::dataset::Dataset;
use crate::views::{compute_outcome_rate_view, compute_scatter_view, PayloadRange, SiteFilter};

/// A user-controlled input on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputId {
    /// The launch site dropdown.
    SiteDropdown,
    /// The payload range slider.
    PayloadSlider,
}

impl InputId {
    /// Element id on the page.
    #[must_use]
    pub const fn element_id(self) -> &'static str {
        match self {
            Self::SiteDropdown => "site-dropdown",
            Self::PayloadSlider => "payload-slider",
        }
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

/// A chart region on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputSlot {
    /// The success-rate pie.
    SuccessPieGraph,
    /// The payload-vs-outcome scatter.
    SuccessScatterGraph,
}

impl OutputSlot {
    /// Element id on the page.
    #[must_use]
    pub const fn element_id(self) -> &'static str {
        match self {
            Self::SuccessPieGraph => "success-pie-graph",
            Self::SuccessScatterGraph => "success-scatter-graph",
        }
    }
}

impl fmt::Display for OutputSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

/// Current values of every input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    /// Dropdown selection.
    pub site: SiteFilter,
    /// Slider selection.
    pub payload: PayloadRange,
}

/// Renders one slot from the dataset and the current inputs.
pub type Handler = fn(&Dataset, &InputState) -> Figure;

/// One registration: `slot` is re-rendered by `handler` when any of `inputs` changes.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The slot this binding renders.
    pub slot: OutputSlot,
    /// Inputs that trigger a re-render.
    pub inputs: Vec<InputId>,
    /// Rendering function.
    pub handler: Handler,
}

impl Binding {
    /// Check whether a change to `input` triggers this binding.
    #[must_use]
    pub fn listens_to(&self, input: InputId) -> bool {
        self.inputs.contains(&input)
    }
}

/// A rendered replacement for a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotUpdate {
    /// The slot to replace.
    pub slot: OutputSlot,
    /// The new figure.
    pub figure: Figure,
}

/// Registration table mapping inputs to slot handlers.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    bindings: Vec<Binding>,
}

impl BindingTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The launch dashboard wiring: the pie follows the dropdown, the scatter
    /// follows both the dropdown and the slider.
    #[must_use]
    pub fn dashboard() -> Self {
        Self::new()
            .bind(
                OutputSlot::SuccessPieGraph,
                &[InputId::SiteDropdown],
                render_success_pie,
            )
            .bind(
                OutputSlot::SuccessScatterGraph,
                &[InputId::SiteDropdown, InputId::PayloadSlider],
                render_success_scatter,
            )
    }

    /// Register `handler` for `slot`. A slot has at most one binding; binding
    /// it again replaces the earlier registration in place.
    #[must_use]
    pub fn bind(mut self, slot: OutputSlot, inputs: &[InputId], handler: Handler) -> Self {
        let binding = Binding {
            slot,
            inputs: inputs.to_vec(),
            handler,
        };
        match self.bindings.iter_mut().find(|existing| existing.slot == slot) {
            Some(existing) => *existing = binding,
            None => self.bindings.push(binding),
        }
        self
    }

    /// All registrations in order.
    #[must_use]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Slots affected by a change to `input`, in registration order.
    #[must_use]
    pub fn slots_for(&self, input: InputId) -> Vec<OutputSlot> {
        self.bindings
            .iter()
            .filter(|binding| binding.listens_to(input))
            .map(|binding| binding.slot)
            .collect()
    }

    /// Re-render the slots bound to `changed`.
    #[must_use]
    pub fn dispatch(
        &self,
        dataset: &Dataset,
        state: &InputState,
        changed: InputId,
    ) -> Vec<SlotUpdate> {
        let updates: Vec<SlotUpdate> = self
            .bindings
            .iter()
            .filter(|binding| binding.listens_to(changed))
            .map(|binding| render(binding, dataset, state))
            .collect();

        debug!(
            changed = %changed,
            site = %state.site,
            payload = %state.payload,
            slots = updates.len(),
            "Dispatched input change"
        );
        updates
    }

    /// Render every slot, as on first page load.
    #[must_use]
    pub fn render_all(&self, dataset: &Dataset, state: &InputState) -> Vec<SlotUpdate> {
        self.bindings
            .iter()
            .map(|binding| render(binding, dataset, state))
            .collect()
    }
}

fn render(binding: &Binding, dataset: &Dataset, state: &InputState) -> SlotUpdate {
    SlotUpdate {
        slot: binding.slot,
        figure: (binding.handler)(dataset, state),
    }
}

fn render_success_pie(dataset: &Dataset, state: &InputState) -> Figure {
    outcome_rate_figure(&compute_outcome_rate_view(dataset, &state.site))
}

fn render_success_scatter(dataset: &Dataset, state: &InputState) -> Figure {
    scatter_figure(&compute_scatter_view(dataset, &state.site, state.payload))
}
