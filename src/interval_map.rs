use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

/// A map from an ordered key space to values, stored as the points where the
/// mapped value changes.
///
/// Conceptually the map is a total function over all of `K`: every key has a
/// value. Keys smaller than the smallest stored breakpoint (and every key at
/// all, while the map is empty) take the background value fixed at
/// construction. A stored breakpoint `k -> v` means the function switches to
/// `v` at `k` and holds it until the next larger breakpoint, or forever.
///
/// The representation is kept canonical at all times: no two consecutive
/// breakpoints carry equal values, and the first breakpoint never repeats the
/// background value. The breakpoint count is therefore the minimum possible
/// for the function being represented, and comparing two maps with the same
/// background reduces to comparing their breakpoints.
#[derive(Clone)]
pub struct IntervalMap<K, V> {
    breakpoints: BTreeMap<K, V>,
    background: V,
}

impl<K, V> IntervalMap<K, V>
where
    K: Ord + Clone,
    V: Eq + Clone,
{
    /// Creates a map associating the whole key space with `background`.
    ///
    /// The background value is fixed for the lifetime of the map; `assign`
    /// can shadow it over an interval but never replaces it.
    pub fn new(background: V) -> Self {
        Self {
            breakpoints: BTreeMap::new(),
            background,
        }
    }

    /// Returns the value associated with `key`: the value of the greatest
    /// breakpoint at or below `key`, or the background value if there is
    /// none. Defined for every key, including keys no assignment has touched.
    pub fn lookup(&self, key: &K) -> &V {
        self.breakpoints
            .range(..=key)
            .next_back()
            .map(|(_, value)| value)
            .unwrap_or(&self.background)
    }

    /// Assigns `value` to the half-open interval `[begin, end)`, overwriting
    /// whatever was previously mapped there. Keys outside the interval keep
    /// their value, including `end` itself.
    ///
    /// If `!(begin < end)` the interval is empty and the call does nothing.
    pub fn assign(&mut self, begin: K, end: K, value: V) {
        if !(begin < end) {
            return;
        }

        // The run in effect just before `begin` survives the assignment, so
        // a breakpoint at `begin` is only wanted if the value actually
        // changes there.
        let begin_starts_new_run = match self.breakpoints.range(..&begin).next_back() {
            Some((_, before)) => *before != value,
            None => self.background != value,
        };

        /*
         * One forward pass over the breakpoints the interval touches. Every
         * breakpoint strictly inside [begin, end) is overwritten wholesale; a
         * breakpoint sitting exactly at `end` marks where the old map takes
         * over again and is dealt with separately below.
         */
        let mut swallowed = Vec::new();
        let mut end_has_breakpoint = false;
        for (key, _) in self.breakpoints.range(&begin..=&end) {
            if !(*key < end) {
                end_has_breakpoint = true;
                break;
            }
            swallowed.push(key.clone());
        }

        // Removing in ascending order leaves `value_at_end` holding the value
        // the old map had in effect just below `end`.
        let mut value_at_end = None;
        for key in &swallowed {
            value_at_end = self.breakpoints.remove(key);
        }

        if end_has_breakpoint {
            // The old map already changes value exactly at `end`. That
            // breakpoint stays, unless it repeats the value being written, in
            // which case the new run absorbs it.
            if self.breakpoints.get(&end) == Some(&value) {
                self.breakpoints.remove(&end);
            }
        } else {
            /*
             * The value the old map had at `end` must resume there: the value
             * of the last swallowed breakpoint, or of the run already in
             * effect before `begin` if the interval swallowed nothing. The
             * swallowed value is reused by move; only re-opening the tail of
             * a surrounding run costs a clone.
             */
            let resumed = match value_at_end {
                Some(owned) => {
                    if owned != value {
                        Some(owned)
                    } else {
                        None
                    }
                }
                None => {
                    let before = self
                        .breakpoints
                        .range(..&begin)
                        .next_back()
                        .map(|(_, before)| before)
                        .unwrap_or(&self.background);
                    if *before != value {
                        Some(before.clone())
                    } else {
                        None
                    }
                }
            };
            if let Some(resumed) = resumed {
                self.breakpoints.insert(end, resumed);
            }
        }

        if begin_starts_new_run {
            self.breakpoints.insert(begin, value);
        }
    }

    /// Read access to the background value.
    pub fn background(&self) -> &V {
        &self.background
    }

    /// Walks the stored breakpoints in increasing key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.breakpoints.iter()
    }

    /// Number of stored breakpoints. Note this counts representation
    /// entries, not runs: the run before the first breakpoint is implicit.
    pub fn len(&self) -> usize {
        self.breakpoints.len()
    }

    /// Whether the map stores no breakpoints, i.e. every key maps to the
    /// background value.
    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }

    /// Checks that the representation is in canonical form: the first stored
    /// value differs from the background and no two consecutive breakpoints
    /// store equal values. `assign` maintains this unconditionally; the
    /// check exists so a test harness can verify it from outside.
    pub fn is_canonical(&self) -> bool {
        let mut previous = &self.background;
        for (_, value) in self.breakpoints.iter() {
            if value == previous {
                return false;
            }
            previous = value;
        }
        true
    }
}

impl<K, V> Index<&K> for IntervalMap<K, V>
where
    K: Ord + Clone,
    V: Eq + Clone,
{
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.lookup(key)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntervalMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalMap")
            .field("background", &self.background)
            .field("breakpoints", &self.breakpoints)
            .finish()
    }
}
