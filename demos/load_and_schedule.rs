use std::path::PathBuf;

use runtime_graph::error::Result;
use runtime_graph::{AttributeDescription, GraphOptions, ModelWriter, ParameterDescription, RuntimeGraph};

/// Writes a small conv -> relu -> linear model unless structure and weights
/// paths are given, then initializes, schedules and prints the graph.
fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let dir = tempfile::tempdir()?;

    let (param_path, bin_path) = if args.len() >= 3 {
        (PathBuf::from(&args[1]), PathBuf::from(&args[2]))
    } else {
        let param_path = dir.path().join("demo.pnnx.param");
        let bin_path = dir.path().join("demo.pnnx.bin");
        println!("Writing sample model to {}", dir.path().display());
        sample_model()?.write(&param_path, &bin_path)?;
        (param_path, bin_path)
    };
    let entry = args.get(3).map(String::as_str).unwrap_or("pnnx_input_0");
    let exit = args.get(4).map(String::as_str).unwrap_or("pnnx_output_0");

    let options = GraphOptions::new().require_defined_operators(true);
    let mut graph = RuntimeGraph::with_options(
        param_path.to_string_lossy(),
        bin_path.to_string_lossy(),
        options,
    );

    graph.init()?;
    println!("Loaded {} operators", graph.operators().len());

    graph.build(entry, exit)?;
    println!("Execution order from {} to {}:", graph.input_name(), graph.output_name());
    for (i, op) in graph.get_topo_seq().iter().enumerate() {
        let shape = op
            .output_operand
            .as_ref()
            .map(|o| format!("{:?}", o.shape))
            .unwrap_or_else(|| "-".to_string());
        println!("  {:>2}. {:<16} {:<16} output {}", i, op.name, op.op_type, shape);
        for (name, param) in &op.params {
            println!("        {} = {:?}", name, param);
        }
    }

    println!("{}", graph.summary_json()?);
    Ok(())
}

fn sample_model() -> Result<ModelWriter> {
    let mut writer = ModelWriter::new("demo");
    writer
        .add_operand("0", 1, &[1, 3, 8, 8])
        .add_operand("1", 1, &[1, 4, 8, 8])
        .add_operand("2", 1, &[1, 4, 8, 8])
        .add_operand("3", 1, &[1, 256])
        .add_operand("4", 1, &[1, 10])
        .add_node("pnnx_input_0", "pnnx.Input", &[], &["0"])
        .add_node("conv", "nn.Conv2d", &["0"], &["1"])
        .add_node("relu", "nn.ReLU", &["1"], &["2"])
        .add_node("flatten", "torch.flatten", &["2"], &["3"])
        .add_node("linear", "nn.Linear", &["3"], &["4"])
        .add_node("pnnx_output_0", "pnnx.Output", &["4"], &[]);

    writer.add_parameter("conv", "kernel_size", ParameterDescription::int_array(vec![3, 3]))?;
    writer.add_parameter("conv", "padding", ParameterDescription::int_array(vec![1, 1]))?;
    writer.add_parameter("linear", "bias", ParameterDescription::bool(true))?;
    writer.add_parameter("linear", "in_features", ParameterDescription::int(256))?;
    writer.add_parameter("linear", "out_features", ParameterDescription::int(10))?;

    writer.add_attribute("conv", "weight", AttributeDescription::from_f32(vec![4, 3, 3, 3], &[0.1; 108]))?;
    writer.add_attribute("linear", "weight", AttributeDescription::from_f32(vec![10, 256], &[0.01; 2560]))?;
    writer.add_attribute("linear", "bias", AttributeDescription::from_f32(vec![10], &[0.0; 10]))?;
    Ok(writer)
}
