use num_traits::{NumCast, ToPrimitive};

/// checked numeric conversion, `None` if `value` does not fit in `T`
pub(crate) fn cast<T: NumCast, U: ToPrimitive>(value: U) -> Option<T> {
    T::from(value)
}

/// `(min, max)` over every tag yielded, `(0, 0)` when there are none
pub(crate) fn tag_range<'a, I>(tags: I) -> (u64, u64)
where
    I: IntoIterator<Item = &'a u64>,
{
    tags.into_iter()
        .fold(None, |range, &tag| match range {
            None => Some((tag, tag)),
            Some((min, max)) => Some((u64::min(min, tag), u64::max(max, tag))),
        })
        .unwrap_or((0, 0))
}

/// initial capacity for a buffer sized from a count read out of a file.
///
/// Counts come from untrusted input, so the allocation up front is bounded and the
/// buffer grows normally past that point.
pub(crate) fn capacity(count: u64, width: usize) -> usize {
    const MAX_PREALLOCATED: u64 = 1 << 16;
    (count.min(MAX_PREALLOCATED) as usize).saturating_mul(width.max(1))
}
