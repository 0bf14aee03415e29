use num_traits::{One, Zero};

use super::CartesianPoint2d;

/// Signed shoelace area of the closed ring formed by `points`.
///
/// The ring is implicitly closed, the last point must not repeat the first one (if it does, the extra segment has
/// zero length and does not change the result). Counterclockwise rings have positive area.
pub fn area_signed<P: CartesianPoint2d>(points: &[P]) -> P::Num {
    let Some(last) = points.last() else {
        return P::Num::zero();
    };

    let mut prev = last;
    let mut aggr = P::Num::zero();
    for p in points {
        aggr = aggr + prev.x() * p.y() - p.x() * prev.y();
        prev = p;
    }

    aggr / (P::Num::one() + P::Num::one())
}
