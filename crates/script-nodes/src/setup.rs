//! Extensions setup for host applications.
//!
//! Hosts call [`setup_extensions`] before evaluating to install the objects
//! built-in nodes look for: the [`Console`] written by `print` and the
//! [`GraphLibrary`] used by `call-graph`.

use std::sync::Arc;

use script_engine::{extension_keys, EvalExtensions, GraphLibrary};

use crate::console::Console;

/// Install a fresh console and the given graph library.
///
/// Returns the console so the host can read printed lines afterwards.
///
/// # Example
///
/// ```ignore
/// let mut extensions = EvalExtensions::new();
/// let console = script_nodes::setup_extensions(&mut extensions, Arc::new(library));
/// let mut ctx = EvalContext::new().with_extensions(Arc::new(extensions));
/// ```
pub fn setup_extensions(extensions: &mut EvalExtensions, library: Arc<GraphLibrary>) -> Arc<Console> {
    let console = Arc::new(Console::new());
    extensions.set(extension_keys::CONSOLE, console.clone());
    log::debug!("Installed graph library with {} graph(s)", library.len());
    extensions.set(extension_keys::GRAPH_LIBRARY, library);
    console
}

#[cfg(test)]
mod tests {
    use super::*;
    use script_engine::Graph;

    #[test]
    fn test_setup_installs_console_and_library() {
        let mut library = GraphLibrary::new();
        library.insert(Graph::new("helper"));

        let mut extensions = EvalExtensions::new();
        let console = setup_extensions(&mut extensions, Arc::new(library));

        let installed = extensions
            .get::<Arc<Console>>(extension_keys::CONSOLE)
            .unwrap();
        assert!(Arc::ptr_eq(installed, &console));
        assert!(extensions
            .get::<Arc<GraphLibrary>>(extension_keys::GRAPH_LIBRARY)
            .unwrap()
            .contains("helper"));
    }
}
