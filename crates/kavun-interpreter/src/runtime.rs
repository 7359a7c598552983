use crate::animation::AnimationHandle;
use kavun_errors::CallTrace;
use kavun_parser::ExpressionCache;
use kavun_value::FrameStack;
use std::collections::HashMap;
use std::io::Write;

/// A user-defined function: its parameter names and its body lines, exactly
/// as collected by the block structurer at the `<params> ile <name> işi:`
/// site (spec.md §4.4.4).
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub params: Vec<String>,
    pub body: Vec<String>,
}

/// All interpreter-owned state: the frame stack, the user function and
/// expression caches, the advisory call trace, the background animation
/// handle and the sink statements print to. One `Runtime` lives for the
/// duration of a whole program run (spec.md §4.5).
pub struct Runtime {
    pub frames: FrameStack,
    pub functions: HashMap<String, FunctionDef>,
    pub cache: ExpressionCache,
    pub call_trace: CallTrace,
    pub animation: AnimationHandle,
    pub out: Box<dyn Write>,
}

impl Runtime {
    pub fn new(out: Box<dyn Write>) -> Self {
        Self {
            frames: FrameStack::new(),
            functions: HashMap::new(),
            cache: ExpressionCache::new(),
            call_trace: CallTrace::new(),
            animation: AnimationHandle::new(),
            out,
        }
    }

    pub fn println(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }

    pub fn print_inline(&mut self, text: &str) {
        let _ = write!(self.out, "{text}");
        let _ = self.out.flush();
    }
}
