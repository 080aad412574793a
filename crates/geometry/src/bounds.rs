//! Axis-aligned bounding boxes in the host's edge convention
//!
//! Bounds are stored as four edges `(left, top, right, bottom)` the way the
//! host document reports geometric bounds. Document space is y-up, so for
//! bounds produced by this crate `top` is the largest y and `bottom` the
//! smallest. Raw bounds handed over by a host are not required to be
//! ordered, which is why [`Bounds::union`] compares each edge against its own
//! extremum instead of normalizing min/max corners.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box described by its four edges.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Smallest x
    pub left: f64,
    /// Largest y
    pub top: f64,
    /// Largest x
    pub right: f64,
    /// Smallest y
    pub bottom: f64,
}

impl Bounds {
    /// The identity for [`Bounds::union`].
    ///
    /// Every edge starts at the opposite infinity, so the first union with
    /// real bounds replaces it entirely. A subtree with no items aggregates
    /// to exactly this value.
    pub const EMPTY: Self = Self {
        left: f64::INFINITY,
        top: f64::NEG_INFINITY,
        right: f64::NEG_INFINITY,
        bottom: f64::INFINITY,
    };

    /// Creates bounds from raw edges without reordering them.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates bounds from a center point and full size.
    pub fn from_center_size(center: DVec2, size: DVec2) -> Self {
        let half = size * 0.5;
        Self {
            left: center.x - half.x,
            top: center.y + half.y,
            right: center.x + half.x,
            bottom: center.y - half.y,
        }
    }

    /// Creates the tightest bounds containing every point.
    ///
    /// Returns [`Bounds::EMPTY`] for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = DVec2>) -> Self {
        points.into_iter().fold(Self::EMPTY, |mut bounds, point| {
            bounds.include_point(point);
            bounds
        })
    }

    /// Grows the bounds so they contain `point`.
    pub fn include_point(&mut self, point: DVec2) {
        self.left = self.left.min(point.x);
        self.top = self.top.max(point.y);
        self.right = self.right.max(point.x);
        self.bottom = self.bottom.min(point.y);
    }

    /// Computes the union of two bounds edge by edge.
    pub fn union(&self, other: &Self) -> Self {
        let mut bounds = *self;
        if other.left < bounds.left {
            bounds.left = other.left;
        }
        if other.top > bounds.top {
            bounds.top = other.top;
        }
        if other.right > bounds.right {
            bounds.right = other.right;
        }
        if other.bottom < bounds.bottom {
            bounds.bottom = other.bottom;
        }
        bounds
    }

    /// Returns true when no finite geometry contributed to these bounds.
    pub fn is_empty(&self) -> bool {
        !(self.left.is_finite()
            && self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite())
    }

    /// Returns the midpoint on each axis.
    pub fn center(&self) -> DVec2 {
        DVec2::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Returns the absolute width and height.
    pub fn size(&self) -> DVec2 {
        DVec2::new((self.left - self.right).abs(), (self.top - self.bottom).abs())
    }

    /// Returns the absolute width
    pub fn width(&self) -> f64 {
        self.size().x
    }

    /// Returns the absolute height
    pub fn height(&self) -> f64 {
        self.size().y
    }

    /// Translates every edge by `offset`.
    pub fn translate(&self, offset: DVec2) -> Self {
        Self {
            left: self.left + offset.x,
            top: self.top + offset.y,
            right: self.right + offset.x,
            bottom: self.bottom + offset.y,
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}
