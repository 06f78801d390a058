pub(crate) mod node_mock;
