/// Options controlling how a runtime graph is initialized and built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphOptions {
    /// Allocate per-batch tensors for float32 input operands
    pub allocate_operand_data: bool,
    /// Allocate per-batch tensors for float32 output operands
    pub allocate_output_tensors: bool,
    /// Report an error when a consumer is referenced but never defined
    pub require_defined_operators: bool,
    /// Panic when `build()` meets a cycle
    pub detect_cycles: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            allocate_operand_data: true,
            allocate_output_tensors: true,
            require_defined_operators: false,
            detect_cycles: true,
        }
    }
}

impl GraphOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable input tensor allocation
    pub fn allocate_operand_data(mut self, enable: bool) -> Self {
        self.allocate_operand_data = enable;
        self
    }

    /// Enable or disable output tensor allocation
    pub fn allocate_output_tensors(mut self, enable: bool) -> Self {
        self.allocate_output_tensors = enable;
        self
    }

    /// Require every referenced operator to be defined
    pub fn require_defined_operators(mut self, enable: bool) -> Self {
        self.require_defined_operators = enable;
        self
    }

    /// Enable or disable cycle detection
    pub fn detect_cycles(mut self, enable: bool) -> Self {
        self.detect_cycles = enable;
        self
    }
}
