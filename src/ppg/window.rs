/// One slot of the sample window.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WindowEntry {
    pub red: u32,
    pub ir: u32,
    pub ac_red: f32,
    pub ac_ir: f32,
}

/// Fixed-capacity circular history of raw and AC samples
///
/// Raw and AC values are kept in parallel arrays aligned index-for-index so
/// the AC channels can be handed out as contiguous slices for RMS.
#[derive(Debug, Clone)]
pub struct SampleWindow<const N: usize> {
    red: [u32; N],
    ir: [u32; N],
    ac_red: [f32; N],
    ac_ir: [f32; N],
    index: usize,
    filled: bool,
}

impl<const N: usize> SampleWindow<N> {
    pub fn new() -> Self {
        Self {
            red: [0; N],
            ir: [0; N],
            ac_red: [0.0; N],
            ac_ir: [0.0; N],
            index: 0,
            filled: false,
        }
    }

    /// Store an entry at the write index and advance it.
    pub fn push(&mut self, entry: WindowEntry) {
        self.red[self.index] = entry.red;
        self.ir[self.index] = entry.ir;
        self.ac_red[self.index] = entry.ac_red;
        self.ac_ir[self.index] = entry.ac_ir;

        self.index = (self.index + 1) % N;
        if self.index == 0 {
            self.filled = true;
        }
    }

    /// The most recently written entry
    pub fn latest(&self) -> Option<WindowEntry> {
        if !self.filled && self.index == 0 {
            return None;
        }
        let i = (self.index + N - 1) % N;
        Some(WindowEntry {
            red: self.red[i],
            ir: self.ir[i],
            ac_red: self.ac_red[i],
            ac_ir: self.ac_ir[i],
        })
    }

    /// AC samples of the RED channel in storage order
    pub fn ac_red(&self) -> &[f32] {
        &self.ac_red
    }

    /// AC samples of the IR channel in storage order
    pub fn ac_ir(&self) -> &[f32] {
        &self.ac_ir
    }

    /// Raw (red, ir) pairs oldest to newest
    pub fn raw_chronological(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let (start, len) = if self.filled {
            (self.index, N)
        } else {
            (0, self.index)
        };
        (0..len).map(move |k| {
            let i = (start + k) % N;
            (self.red[i], self.ir[i])
        })
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    pub fn write_index(&self) -> usize {
        self.index
    }

    pub fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for SampleWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(v: u32) -> WindowEntry {
        WindowEntry {
            red: v,
            ir: v * 10,
            ac_red: v as f32,
            ac_ir: -(v as f32),
        }
    }

    #[test]
    fn test_empty_window() {
        let window: SampleWindow<4> = SampleWindow::new();
        assert!(!window.is_filled());
        assert!(window.latest().is_none());
        assert_eq!(window.raw_chronological().count(), 0);
    }

    #[test]
    fn test_fills_on_wrap() {
        let mut window: SampleWindow<3> = SampleWindow::new();
        window.push(entry(1));
        window.push(entry(2));
        assert!(!window.is_filled());
        assert_eq!(window.latest(), Some(entry(2)));

        window.push(entry(3));
        assert!(window.is_filled());
        assert_eq!(window.write_index(), 0);
        assert_eq!(window.latest(), Some(entry(3)));
    }

    #[test]
    fn test_overwrites_oldest() {
        let mut window: SampleWindow<3> = SampleWindow::new();
        for v in 1..=5 {
            window.push(entry(v));
        }

        let raw: Vec<(u32, u32)> = window.raw_chronological().collect();
        assert_eq!(raw, vec![(3, 30), (4, 40), (5, 50)]);
        assert_eq!(window.latest(), Some(entry(5)));

        // Storage order, not chronological: slot 0 holds sample 4
        assert_eq!(window.ac_red(), &[4.0, 5.0, 3.0]);
        assert_eq!(window.ac_ir(), &[-4.0, -5.0, -3.0]);
    }
}
