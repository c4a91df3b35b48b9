use log::info;
use ndarray::{s, Array3, ArrayView2, ArrayView3, ArrayViewMut2, ShapeBuilder};
use rand::Rng;
use rand_distr::StandardNormal;

/// Dense float tensor of up to three dimensions (channels, rows, cols).
///
/// Storage is a column-major cube indexed `[row, col, channel]`: channel
/// planes are contiguous and each plane is stored column by column. The
/// canonical `raw_shape` drops leading unit dimensions, so a `1 x 1 x n`
/// tensor reports `[n]` and a `1 x r x c` tensor reports `[r, c]`.
///
/// Every operation that touches the buffer panics on an empty tensor, and
/// shape/size precondition violations panic as well. Callers validate first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tensor {
    raw_shape: Vec<usize>,
    data: Array3<f32>,
}

impl Tensor {
    /// Create a zeroed `channels x rows x cols` tensor
    pub fn new(channels: usize, rows: usize, cols: usize) -> Self {
        assert!(
            channels > 0 && rows > 0 && cols > 0,
            "Tensor dimensions must be positive, got {}x{}x{}",
            channels,
            rows,
            cols
        );

        Self {
            raw_shape: Self::canonical_shape(channels, rows, cols),
            data: Self::allocate(channels, rows, cols),
        }
    }

    /// Create a zeroed one-dimensional tensor
    pub fn with_size(size: usize) -> Self {
        Self::new(1, 1, size)
    }

    /// Create a zeroed `rows x cols` tensor
    pub fn with_rows_cols(rows: usize, cols: usize) -> Self {
        Self::new(1, rows, cols)
    }

    /// Create a zeroed tensor from a shape of one to three dimensions.
    /// Missing leading dimensions are taken as 1.
    pub fn from_shape(shape: &[usize]) -> Self {
        assert!(
            !shape.is_empty() && shape.len() <= 3,
            "Tensor shape must have 1 to 3 dimensions, got {:?}",
            shape
        );

        let (channels, rows, cols) = Self::assign_each_shape(shape);
        Self::new(channels, rows, cols)
    }

    fn allocate(channels: usize, rows: usize, cols: usize) -> Array3<f32> {
        Array3::zeros((rows, cols, channels).f())
    }

    fn canonical_shape(channels: usize, rows: usize, cols: usize) -> Vec<usize> {
        if channels > 1 {
            vec![channels, rows, cols]
        } else if rows > 1 {
            vec![rows, cols]
        } else {
            vec![cols]
        }
    }

    fn assign_each_shape(shape: &[usize]) -> (usize, usize, usize) {
        match *shape {
            [channels, rows, cols] => (channels, rows, cols),
            [rows, cols] => (1, rows, cols),
            [cols] => (1, 1, cols),
            _ => panic!("Tensor shape must have 1 to 3 dimensions, got {:?}", shape),
        }
    }

    fn check_not_empty(&self) {
        assert!(!self.data.is_empty(), "Tensor buffer is empty");
    }

    pub fn rows(&self) -> usize {
        self.check_not_empty();
        self.data.dim().0
    }

    pub fn cols(&self) -> usize {
        self.check_not_empty();
        self.data.dim().1
    }

    pub fn channels(&self) -> usize {
        self.check_not_empty();
        self.data.dim().2
    }

    /// Number of elements
    pub fn size(&self) -> usize {
        self.check_not_empty();
        self.data.len()
    }

    /// Canonical shape with leading unit dimensions dropped
    pub fn raw_shapes(&self) -> &[usize] {
        assert!(
            !self.raw_shape.is_empty() && self.raw_shape.len() <= 3,
            "Tensor raw shape must have 1 to 3 dimensions, got {:?}",
            self.raw_shape
        );
        &self.raw_shape
    }

    /// Full `[channels, rows, cols]` extents
    pub fn shapes(&self) -> [usize; 3] {
        [self.channels(), self.rows(), self.cols()]
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Storage cube indexed `[row, col, channel]`
    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    /// Storage as a flat slice in storage order
    pub fn as_slice(&self) -> &[f32] {
        self.check_not_empty();
        self.data
            .as_slice_memory_order()
            .expect("tensor storage is always contiguous")
    }

    /// Replace the contents with a `[channels, rows, cols]` array of the same extents
    pub fn set_data(&mut self, data: ArrayView3<f32>) {
        let (channels, rows, cols) = data.dim();
        assert_eq!(rows, self.rows(), "row count mismatch in set_data");
        assert_eq!(cols, self.cols(), "column count mismatch in set_data");
        assert_eq!(channels, self.channels(), "channel count mismatch in set_data");

        self.data.view_mut().permuted_axes([2, 0, 1]).assign(&data);
    }

    /// Set every element to `value`
    pub fn fill_value(&mut self, value: f32) {
        self.check_not_empty();
        self.data.fill(value);
    }

    pub fn ones(&mut self) {
        self.fill_value(1.0);
    }

    /// Fill with samples from the standard normal distribution
    pub fn rand(&mut self) {
        self.check_not_empty();
        let mut rng = rand::thread_rng();
        self.data.mapv_inplace(|_| rng.sample(StandardNormal));
    }

    /// Import a flat buffer.
    ///
    /// With `row_major` each channel is read as a row-major plane; otherwise
    /// the buffer is taken in storage order.
    pub fn fill(&mut self, values: &[f32], row_major: bool) {
        self.check_not_empty();
        assert_eq!(
            values.len(),
            self.data.len(),
            "fill expects {} values, got {}",
            self.data.len(),
            values.len()
        );

        if row_major {
            let planes = self.data.view_mut().permuted_axes([2, 0, 1]);
            for (dst, &src) in planes.into_iter().zip(values) {
                *dst = src;
            }
        } else {
            let storage = self.data.view_mut().reversed_axes();
            for (dst, &src) in storage.into_iter().zip(values) {
                *dst = src;
            }
        }
    }

    /// Flat snapshot of the contents.
    ///
    /// With `row_major` each channel plane is emitted row by row; otherwise
    /// the storage order is returned (channel-major, column-major planes).
    pub fn values(&self, row_major: bool) -> Vec<f32> {
        self.check_not_empty();

        if row_major {
            self.data.view().permuted_axes([2, 0, 1]).iter().copied().collect()
        } else {
            self.data.view().reversed_axes().iter().copied().collect()
        }
    }

    /// Log every channel plane
    pub fn show(&self) {
        for i in 0..self.channels() {
            info!("channel: {}", i);
            info!("\n{}", self.slice(i));
        }
    }

    /// `rows x cols` plane of one channel
    pub fn slice(&self, channel: usize) -> ArrayView2<'_, f32> {
        assert!(
            channel < self.channels(),
            "channel {} out of range for {} channels",
            channel,
            self.channels()
        );
        self.data.index_axis(ndarray::Axis(2), channel)
    }

    pub fn slice_mut(&mut self, channel: usize) -> ArrayViewMut2<'_, f32> {
        assert!(
            channel < self.channels(),
            "channel {} out of range for {} channels",
            channel,
            self.channels()
        );
        self.data.index_axis_mut(ndarray::Axis(2), channel)
    }

    fn check_index(&self, channel: usize, row: usize, col: usize) {
        assert!(row < self.rows(), "row {} out of range for {} rows", row, self.rows());
        assert!(col < self.cols(), "col {} out of range for {} cols", col, self.cols());
        assert!(
            channel < self.channels(),
            "channel {} out of range for {} channels",
            channel,
            self.channels()
        );
    }

    pub fn at(&self, channel: usize, row: usize, col: usize) -> f32 {
        self.check_index(channel, row, col);
        self.data[[row, col, channel]]
    }

    pub fn at_mut(&mut self, channel: usize, row: usize, col: usize) -> &mut f32 {
        self.check_index(channel, row, col);
        &mut self.data[[row, col, channel]]
    }

    /// Change the shape, keeping the element sequence of the chosen
    /// linearization order. `shape` must hold as many elements as the tensor.
    pub fn reshape(&mut self, shape: &[usize], row_major: bool) {
        self.check_not_empty();
        assert!(
            !shape.is_empty() && shape.len() <= 3,
            "reshape target must have 1 to 3 dimensions, got {:?}",
            shape
        );

        let origin_size = self.size();
        let current_size: usize = shape.iter().product();
        assert_eq!(
            origin_size, current_size,
            "cannot reshape {} elements into {:?}",
            origin_size, shape
        );

        let values = self.values(row_major);
        let (channels, rows, cols) = Self::assign_each_shape(shape);

        self.data = Self::allocate(channels, rows, cols);
        self.raw_shape = Self::canonical_shape(channels, rows, cols);
        self.fill(&values, row_major);
    }

    /// Reshape to a single dimension
    pub fn flatten(&mut self, row_major: bool) {
        let size = self.size();
        self.reshape(&[1, 1, size], row_major);
    }

    /// Grow each plane by `pads = [up, down, left, right]`, filling the new
    /// border with `padding_value`.
    pub fn padding(&mut self, pads: &[usize], padding_value: f32) {
        self.check_not_empty();
        assert_eq!(pads.len(), 4, "padding expects [up, down, left, right], got {:?}", pads);

        let (up, down, left, right) = (pads[0], pads[1], pads[2], pads[3]);
        let (origin_rows, origin_cols, channels) = self.data.dim();

        let rows = origin_rows + up + down;
        let cols = origin_cols + left + right;

        let mut data = Array3::from_elem((rows, cols, channels).f(), padding_value);
        data.slice_mut(s![up..up + origin_rows, left..left + origin_cols, ..])
            .assign(&self.data);

        self.data = data;
        self.raw_shape = Self::canonical_shape(channels, rows, cols);
    }

    /// Apply `f` to every element in place
    pub fn transform<F>(&mut self, f: F)
    where
        F: FnMut(f32) -> f32,
    {
        self.check_not_empty();
        self.data.mapv_inplace(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequential(channels: usize, rows: usize, cols: usize) -> Tensor {
        let mut tensor = Tensor::new(channels, rows, cols);
        let values: Vec<f32> = (1..=tensor.size()).map(|v| v as f32).collect();
        tensor.fill(&values, true);
        tensor
    }

    #[test]
    fn test_canonical_shapes() {
        assert_eq!(Tensor::with_size(7).raw_shapes(), &[7]);
        assert_eq!(Tensor::with_rows_cols(1, 5).raw_shapes(), &[5]);
        assert_eq!(Tensor::with_rows_cols(3, 5).raw_shapes(), &[3, 5]);
        assert_eq!(Tensor::new(1, 1, 4).raw_shapes(), &[4]);
        assert_eq!(Tensor::new(1, 2, 4).raw_shapes(), &[2, 4]);
        assert_eq!(Tensor::new(3, 2, 4).raw_shapes(), &[3, 2, 4]);
        assert_eq!(Tensor::new(1, 1, 1).raw_shapes(), &[1]);
        assert_eq!(Tensor::from_shape(&[2, 3]).shapes(), [1, 2, 3]);
        assert_eq!(Tensor::from_shape(&[6]).shapes(), [1, 1, 6]);
    }

    #[test]
    fn test_row_major_fill_positions() {
        let tensor = sequential(2, 3, 4);
        assert_eq!(tensor.at(0, 0, 0), 1.0);
        assert_eq!(tensor.at(0, 0, 1), 2.0);
        assert_eq!(tensor.at(0, 1, 0), 5.0);
        assert_eq!(tensor.at(1, 0, 0), 13.0);
        assert_eq!(tensor.at(1, 2, 3), 24.0);
    }

    #[test]
    fn test_storage_order_is_column_major_per_plane() {
        let tensor = sequential(2, 3, 4);
        let storage = tensor.values(false);
        assert_eq!(&storage[..4], &[1.0, 5.0, 9.0, 2.0]);
        assert_eq!(storage[12], 13.0);
        assert_eq!(tensor.as_slice(), storage.as_slice());
    }

    #[test]
    fn test_reshape_keeps_row_major_sequence() {
        let mut tensor = sequential(2, 3, 4);
        tensor.reshape(&[4, 3, 2], true);

        assert_eq!(tensor.shapes(), [4, 3, 2]);
        assert_eq!(tensor.at(0, 0, 1), 2.0);
        assert_eq!(tensor.at(1, 0, 0), 7.0);
        let expected: Vec<f32> = (1..=24).map(|v| v as f32).collect();
        assert_eq!(tensor.values(true), expected);
    }

    #[test]
    fn test_reshape_storage_order() {
        let mut tensor = sequential(1, 2, 3);
        let before = tensor.values(false);
        tensor.reshape(&[3, 2], false);
        assert_eq!(tensor.values(false), before);
        assert_eq!(tensor.raw_shapes(), &[3, 2]);
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let mut tensor = sequential(2, 3, 4);
        tensor.flatten(true);
        assert_eq!(tensor.raw_shapes(), &[24]);
        let once = tensor.values(true);
        tensor.flatten(true);
        assert_eq!(tensor.raw_shapes(), &[24]);
        assert_eq!(tensor.values(true), once);
    }

    #[test]
    fn test_padding_geometry() {
        let mut tensor = Tensor::new(3, 4, 5);
        tensor.fill_value(1.0);
        tensor.padding(&[1, 2, 3, 4], 0.0);

        assert_eq!(tensor.rows(), 7);
        assert_eq!(tensor.cols(), 12);
        assert_eq!(tensor.channels(), 3);
        assert_eq!(tensor.raw_shapes(), &[3, 7, 12]);
        for c in 0..3 {
            assert_eq!(tensor.at(c, 2, 5), 1.0);
            assert_eq!(tensor.at(c, 0, 0), 0.0);
        }
    }

    #[test]
    fn test_padding_single_channel_shape() {
        let mut tensor = Tensor::with_size(3);
        tensor.padding(&[0, 0, 1, 1], 2.0);
        assert_eq!(tensor.raw_shapes(), &[5]);
        assert_eq!(tensor.values(true), vec![2.0, 0.0, 0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_transform() {
        let mut tensor = sequential(1, 2, 2);
        tensor.transform(|v| v - 1.0);
        assert_eq!(tensor.values(true), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_set_data() {
        let mut tensor = Tensor::new(2, 2, 2);
        let source = Array3::from_shape_fn((2, 2, 2), |(c, r, col)| (c * 4 + r * 2 + col) as f32);
        tensor.set_data(source.view());
        assert_eq!(tensor.at(1, 0, 1), 5.0);
        assert_eq!(tensor.values(true), (0..8).map(|v| v as f32).collect::<Vec<_>>());
    }

    #[test]
    fn test_slice_is_rows_by_cols() {
        let tensor = sequential(2, 3, 4);
        let plane = tensor.slice(1);
        assert_eq!(plane.dim(), (3, 4));
        assert_eq!(plane[[0, 0]], 13.0);
    }

    #[test]
    fn test_show_logs_every_channel() {
        let tensor = sequential(2, 2, 3);
        tensor.show();
        assert_eq!(tensor.values(true).len(), 12);
    }

    #[test]
    fn test_rand_fills_buffer() {
        let mut tensor = Tensor::new(2, 8, 8);
        tensor.rand();
        assert!(tensor.values(false).iter().any(|&v| v != 0.0));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_at_out_of_range() {
        let tensor = Tensor::new(2, 3, 4);
        tensor.at(2, 0, 0);
    }

    #[test]
    #[should_panic(expected = "cannot reshape")]
    fn test_reshape_size_mismatch() {
        let mut tensor = Tensor::new(2, 3, 4);
        tensor.reshape(&[5, 5], true);
    }

    #[test]
    #[should_panic(expected = "empty")]
    fn test_empty_tensor_access() {
        let tensor = Tensor::default();
        tensor.size();
    }

    #[test]
    #[should_panic(expected = "padding expects")]
    fn test_padding_needs_four_values() {
        let mut tensor = Tensor::new(1, 2, 2);
        tensor.padding(&[1, 1], 0.0);
    }
}
