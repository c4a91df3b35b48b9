use ndarray::Array3;
use runtime_graph::Tensor;

fn sequential(channels: usize, rows: usize, cols: usize) -> Tensor {
    let mut tensor = Tensor::new(channels, rows, cols);
    let values: Vec<f32> = (0..tensor.size()).map(|v| v as f32 * 0.25).collect();
    tensor.fill(&values, true);
    tensor
}

#[test]
fn test_fill_values_round_trip() {
    for &(c, r, w) in &[(1, 1, 7), (1, 4, 3), (3, 2, 5), (2, 6, 1)] {
        for row_major in [true, false] {
            let mut tensor = Tensor::new(c, r, w);
            tensor.rand();
            let before = tensor.clone();

            let values = tensor.values(row_major);
            tensor.fill(&values, row_major);
            assert_eq!(tensor, before, "{}x{}x{} row_major={}", c, r, w, row_major);
        }
    }
}

#[test]
fn test_reshape_preserves_element_count() {
    let mut tensor = sequential(2, 3, 4);
    for shape in [vec![24], vec![4, 6], vec![3, 2, 4], vec![1, 1, 24], vec![2, 12]] {
        tensor.reshape(&shape, true);
        assert_eq!(tensor.size(), 24);
        assert_eq!(tensor.shapes().iter().product::<usize>(), 24);
    }
}

#[test]
fn test_reshape_row_major_keeps_values() {
    let mut tensor = sequential(2, 3, 4);
    let before = tensor.values(true);

    tensor.reshape(&[4, 6], true);
    assert_eq!(tensor.raw_shapes(), &[4, 6]);
    assert_eq!(tensor.values(true), before);

    tensor.reshape(&[3, 2, 4], true);
    assert_eq!(tensor.raw_shapes(), &[3, 2, 4]);
    assert_eq!(tensor.values(true), before);
}

#[test]
fn test_flatten_twice() {
    for row_major in [true, false] {
        let mut tensor = sequential(3, 4, 5);
        tensor.flatten(row_major);
        assert_eq!(tensor.shapes(), [1, 1, 60]);
        assert_eq!(tensor.raw_shapes(), &[60]);

        tensor.flatten(row_major);
        assert_eq!(tensor.shapes(), [1, 1, 60]);
    }
}

#[test]
fn test_padding_three_channels() {
    let mut tensor = Tensor::new(3, 4, 5);
    tensor.ones();
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
fn test_padding_interior_and_border() {
    let mut tensor = sequential(2, 3, 3);
    let original = tensor.clone();
    let (up, down, left, right) = (2, 1, 1, 3);
    tensor.padding(&[up, down, left, right], -1.0);

    for c in 0..2 {
        for r in 0..tensor.rows() {
            for col in 0..tensor.cols() {
                let inside = r >= up && r < up + 3 && col >= left && col < left + 3;
                if inside {
                    assert_eq!(tensor.at(c, r, col), original.at(c, r - up, col - left));
                } else {
                    assert_eq!(tensor.at(c, r, col), -1.0);
                }
            }
        }
    }
    assert_eq!(tensor.rows(), 3 + up + down);
    assert_eq!(tensor.cols(), 3 + left + right);
}

#[test]
fn test_set_data_uses_channel_row_col_order() {
    let mut tensor = Tensor::new(2, 2, 3);
    let data = Array3::from_shape_fn((2, 2, 3), |(c, r, col)| (c * 100 + r * 10 + col) as f32);
    tensor.set_data(data.view());

    assert_eq!(tensor.at(1, 1, 2), 112.0);
    assert_eq!(tensor.at(0, 1, 0), 10.0);
    assert_eq!(tensor.values(true)[..3], [0.0, 1.0, 2.0]);
}

#[test]
fn test_transform_and_at_mut() {
    let mut tensor = Tensor::with_rows_cols(2, 2);
    tensor.fill_value(3.0);
    *tensor.at_mut(0, 1, 1) = -3.0;
    tensor.transform(|v| v.max(0.0));

    assert_eq!(tensor.values(true), vec![3.0, 3.0, 3.0, 0.0]);
    assert_eq!(tensor.data().dim(), (2, 2, 1));
}

#[test]
fn test_from_shape_fills_leading_dimensions() {
    assert_eq!(Tensor::from_shape(&[5]).shapes(), [1, 1, 5]);
    assert_eq!(Tensor::from_shape(&[4, 5]).shapes(), [1, 4, 5]);
    assert_eq!(Tensor::from_shape(&[3, 4, 5]).shapes(), [3, 4, 5]);
    assert_eq!(Tensor::with_size(9).raw_shapes(), &[9]);
}

#[test]
#[should_panic(expected = "cannot reshape")]
fn test_reshape_to_wrong_size() {
    let mut tensor = Tensor::new(2, 3, 4);
    tensor.reshape(&[5, 5], true);
}

#[test]
#[should_panic(expected = "out of range")]
fn test_channel_out_of_range() {
    let tensor = Tensor::new(2, 3, 4);
    tensor.at(2, 0, 0);
}

#[test]
#[should_panic(expected = "Tensor buffer is empty")]
fn test_default_tensor_is_empty() {
    let tensor = Tensor::default();
    assert!(tensor.is_empty());
    tensor.values(true);
}
