use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    Original,
    Melt,
}

/// One contiguous vertical band of the image. Segments come out in strictly
/// increasing `y` order with no gaps; heights are never negative and sum to
/// the requested extent exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub y: u32,
    pub height: u32,
    pub kind: SegmentKind,
}

/// Fractions of the remaining budget reserved for the tail of the map, from
/// the freeze point onward. They sum to 1, which is what makes the total
/// exact despite the random draws before the freeze.
const TAIL_FRACTIONS: [f64; 5] = [0.25, 0.40, 0.20, 0.10, 0.05];

/// Partition `total_height` into `section_hint + 1` height-weighted segments.
///
/// Early segments draw random heights capped at a sixth of the remaining
/// budget, so no single draw can exhaust the extent. Four segments before
/// the end the fractional tail plan freezes against the budget remaining at
/// that instant and the rest of the map consumes the plan in order; the two
/// final segments therefore take exactly the 0.10 and 0.05 allocations.
/// Hints below 4 never freeze a plan and the last segment absorbs whatever
/// budget is left instead.
pub fn generate(
    section_hint: usize,
    total_height: u32,
    rng: &mut dyn RandomSource,
) -> Vec<Segment> {
    let mut bucket = total_height as i64;
    let mut cursor = 0i64;
    let mut plan: Option<[i64; 5]> = None;
    let mut plan_next = 0usize;
    let mut out = Vec::with_capacity(section_hint + 1);

    for index in 0..=section_hint {
        if section_hint >= 4 && index == section_hint - 4 {
            plan = Some(freeze_tail(bucket));
        }

        let candidate = if let Some(p) = plan.as_ref() {
            let v = p[plan_next.min(p.len() - 1)];
            plan_next += 1;
            v
        } else if index == section_hint {
            bucket
        } else {
            let hi = bucket.clamp(21, i32::MAX as i64) as i32;
            let draw = rng.int_in(20, hi) as f64;
            draw.min(bucket as f64 / 6.0).round() as i64
        };
        // Budget exhaustion must clamp, never go negative or overdraw.
        let candidate = candidate.clamp(0, bucket.max(0));

        let kind = if rng.unit() > 0.4 {
            SegmentKind::Melt
        } else {
            SegmentKind::Original
        };

        out.push(Segment {
            y: cursor as u32,
            height: candidate as u32,
            kind,
        });
        bucket -= candidate;
        cursor += candidate;
    }

    out
}

fn freeze_tail(bucket: i64) -> [i64; 5] {
    let b = bucket.max(0);
    let mut plan = TAIL_FRACTIONS.map(|f| (f * b as f64).round() as i64);
    // Integer rounding drift lands on the largest allocation so the two
    // final entries stay at exactly their rounded fractions.
    let drift = b - plan.iter().sum::<i64>();
    plan[1] += drift;
    plan
}
