use crate::models::thermal::hx::core::{FlowState, SizeAttr};

/// A batch of changes applied atomically by [`HxUnit::update`](super::HxUnit::update).
///
/// Fields left unset keep their current value.
#[derive(Debug, Clone)]
#[must_use]
pub struct UnitUpdate<Wf, Sf> {
    pub(super) flow_in_wf: Option<FlowState<Wf>>,
    pub(super) flow_out_wf: Option<FlowState<Wf>>,
    pub(super) flow_in_sf: Option<FlowState<Sf>>,
    pub(super) flow_out_sf: Option<FlowState<Sf>>,
    pub(super) size_attr: Option<SizeAttr>,
    pub(super) size_bounds: Option<[f64; 2]>,
    pub(super) attributes: Vec<(SizeAttr, f64)>,
}

impl<Wf, Sf> Default for UnitUpdate<Wf, Sf> {
    fn default() -> Self {
        Self {
            flow_in_wf: None,
            flow_out_wf: None,
            flow_in_sf: None,
            flow_out_sf: None,
            size_attr: None,
            size_bounds: None,
            attributes: Vec::new(),
        }
    }
}

impl<Wf, Sf> UnitUpdate<Wf, Sf> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flow_in_wf(mut self, flow: FlowState<Wf>) -> Self {
        self.flow_in_wf = Some(flow);
        self
    }

    pub fn flow_out_wf(mut self, flow: FlowState<Wf>) -> Self {
        self.flow_out_wf = Some(flow);
        self
    }

    pub fn flow_in_sf(mut self, flow: FlowState<Sf>) -> Self {
        self.flow_in_sf = Some(flow);
        self
    }

    pub fn flow_out_sf(mut self, flow: FlowState<Sf>) -> Self {
        self.flow_out_sf = Some(flow);
        self
    }

    /// Selects the attribute and bounds used by
    /// [`HxUnit::size_units`](super::HxUnit::size_units).
    pub fn size_attr(mut self, attr: SizeAttr, bounds: [f64; 2]) -> Self {
        self.size_attr = Some(attr);
        self.size_bounds = Some(bounds);
        self
    }

    /// Sets an attribute value. Later values for the same attribute win.
    pub fn attribute(mut self, attr: SizeAttr, value: f64) -> Self {
        self.attributes.push((attr, value));
        self
    }
}
