use std::fmt;

/// Read-only view of a tape at whatever width the run uses.
#[derive(Debug, Clone, Copy)]
pub enum TapeView<'a> {
    I8(&'a [i8]),
    I16(&'a [i16]),
    I32(&'a [i32]),
    I64(&'a [i64]),
}

impl TapeView<'_> {
    pub fn len(&self) -> usize {
        match self {
            TapeView::I8(cells) => cells.len(),
            TapeView::I16(cells) => cells.len(),
            TapeView::I32(cells) => cells.len(),
            TapeView::I64(cells) => cells.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell value sign-extended to 64 bits.
    pub fn get(&self, index: usize) -> Option<i64> {
        match self {
            TapeView::I8(cells) => cells.get(index).map(|&c| c as i64),
            TapeView::I16(cells) => cells.get(index).map(|&c| c as i64),
            TapeView::I32(cells) => cells.get(index).map(|&c| c as i64),
            TapeView::I64(cells) => cells.get(index).copied(),
        }
    }

    pub fn to_vec(&self) -> Vec<i64> {
        (0..self.len()).filter_map(|idx| self.get(idx)).collect()
    }
}

/// A fixed-width signed tape cell with modular arithmetic.
pub trait Cell: Copy + Default + PartialEq + fmt::Debug + 'static {
    /// Truncate to this width.
    fn from_i64(value: i64) -> Self;
    /// Input bytes are stored as their unsigned value, wrapped to the width.
    fn from_byte(byte: u8) -> Self;
    fn low_byte(self) -> u8;
    fn wrapping_add(self, rhs: Self) -> Self;
    fn wrapping_mul(self, rhs: Self) -> Self;
    fn is_zero(self) -> bool;
    fn view(cells: &[Self]) -> TapeView<'_>;
}

macro_rules! impl_cell {
    ($ty:ty, $variant:ident) => {
        impl Cell for $ty {
            #[inline(always)]
            fn from_i64(value: i64) -> Self {
                value as $ty
            }

            #[inline(always)]
            fn from_byte(byte: u8) -> Self {
                byte as $ty
            }

            #[inline(always)]
            fn low_byte(self) -> u8 {
                self as u8
            }

            #[inline(always)]
            fn wrapping_add(self, rhs: Self) -> Self {
                <$ty>::wrapping_add(self, rhs)
            }

            #[inline(always)]
            fn wrapping_mul(self, rhs: Self) -> Self {
                <$ty>::wrapping_mul(self, rhs)
            }

            #[inline(always)]
            fn is_zero(self) -> bool {
                self == 0
            }

            fn view(cells: &[Self]) -> TapeView<'_> {
                TapeView::$variant(cells)
            }
        }
    };
}

impl_cell!(i8, I8);
impl_cell!(i16, I16);
impl_cell!(i32, I32);
impl_cell!(i64, I64);
