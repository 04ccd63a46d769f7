//! The region proposer seam.

use std::sync::atomic::{AtomicUsize, Ordering};

use facesnap_region_model::raster::RasterImage;
use facesnap_region_model::region::NormalizedRegion;

/// Something that can guess where the face is in a frame.
///
/// Implementations swallow their own failures: a transport error, an
/// unparseable answer and "no face" all come back as `None`.
#[async_trait::async_trait]
pub trait RegionProposer: Send + Sync {
    /// Propose a region for a full-frame raster.
    async fn propose(&self, frame: &RasterImage) -> Option<NormalizedRegion>;

    /// Provider name for logs.
    fn name(&self) -> &str;
}

/// Proposer that always answers with the same result.
#[derive(Debug)]
pub struct FixedProposer {
    answer: Option<NormalizedRegion>,
    calls: AtomicUsize,
}

impl FixedProposer {
    /// Always proposes `region`.
    pub fn found(region: NormalizedRegion) -> Self {
        Self {
            answer: Some(region),
            calls: AtomicUsize::new(0),
        }
    }

    /// Never finds a face.
    pub fn empty() -> Self {
        Self {
            answer: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `propose` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RegionProposer for FixedProposer {
    async fn propose(&self, frame: &RasterImage) -> Option<NormalizedRegion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            width = frame.width(),
            height = frame.height(),
            found = self.answer.is_some(),
            "Fixed proposer called"
        );
        self.answer
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
