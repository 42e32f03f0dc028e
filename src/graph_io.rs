use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::config::{EngineConfig, READ_BUFFER_SIZE};
use crate::error::{GraphError, Result};
use crate::types::graph_query::GraphQuery;
use crate::types::vertex_mapper::VertexMapper;
use crate::types::{CSRGraph, InternalIndex, RawEdge, RawVertexId};

/// Streams raw edges out of a whitespace separated integer list.
///
/// Line breaks are ordinary whitespace: tokens are consumed two at a time
/// across the whole input, so a blank line or a line holding several pairs is
/// fine. The scan ends at the first token that is not a signed 64-bit integer,
/// or when a single token is left over at the end of input.
pub struct EdgeScanner<R> {
    reader: R,
    line: Vec<u8>,
    tokens: Vec<RawVertexId>,
    cursor: usize,
    exhausted: bool,
    truncated: bool,
}

impl<R: BufRead> EdgeScanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            tokens: Vec::new(),
            cursor: 0,
            exhausted: false,
            truncated: false,
        }
    }

    /// Whether the scan stopped at a malformed token rather than at the end
    /// of input.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    fn next_token(&mut self) -> io::Result<Option<RawVertexId>> {
        loop {
            if self.cursor < self.tokens.len() {
                self.cursor += 1;
                return Ok(Some(self.tokens[self.cursor - 1]));
            }
            if self.exhausted {
                return Ok(None);
            }

            self.line.clear();
            self.tokens.clear();
            self.cursor = 0;
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                self.exhausted = true;
                continue;
            }

            // Tokens before invalid UTF-8 still count, the bad bytes end the scan.
            let text = match std::str::from_utf8(&self.line) {
                Ok(text) => text,
                Err(err) => {
                    self.exhausted = true;
                    self.truncated = true;
                    std::str::from_utf8(&self.line[..err.valid_up_to()]).unwrap_or_default()
                }
            };
            for token in text.split_ascii_whitespace() {
                match token.parse::<RawVertexId>() {
                    Ok(value) => self.tokens.push(value),
                    Err(_) => {
                        self.exhausted = true;
                        self.truncated = true;
                        break;
                    }
                }
            }
        }
    }

    fn next_edge(&mut self) -> io::Result<Option<RawEdge>> {
        let Some(src) = self.next_token()? else {
            return Ok(None);
        };
        match self.next_token()? {
            Some(dst) => Ok(Some((src, dst))),
            None => {
                self.truncated = true;
                Ok(None)
            }
        }
    }
}

impl<R: BufRead> Iterator for EdgeScanner<R> {
    type Item = io::Result<RawEdge>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_edge().transpose()
    }
}

/// Staging area of the CSR build: remaps raw endpoints as they arrive and keeps
/// the transient internal edge list until `finish` compacts it.
pub struct EdgeListBuilder {
    vertex_mapper: VertexMapper,
    edges: Vec<(InternalIndex, InternalIndex)>,
}

impl EdgeListBuilder {
    pub fn with_capacity(edge_capacity: usize) -> Self {
        Self {
            vertex_mapper: VertexMapper::new(),
            edges: Vec::with_capacity(edge_capacity),
        }
    }

    /// Stages with a caller supplied (possibly capped) mapper.
    pub fn with_vertex_mapper(vertex_mapper: VertexMapper, edge_capacity: usize) -> Self {
        Self {
            vertex_mapper,
            edges: Vec::with_capacity(edge_capacity),
        }
    }

    /// Adds one raw edge. The source is resolved before the target so index
    /// assignment follows input order.
    ///
    /// Fails once the internal index space is exhausted.
    pub fn push(&mut self, src: RawVertexId, dst: RawVertexId) -> Result<()> {
        let limit = self.vertex_mapper.index_limit();
        let too_many = || GraphError::TooManyVertices { limit };
        let src_index = self.vertex_mapper.resolve(src).ok_or_else(too_many)?;
        let dst_index = self.vertex_mapper.resolve(dst).ok_or_else(too_many)?;
        self.edges.push((src_index, dst_index));
        Ok(())
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Sorts the staged edges and compacts them into CSR arrays. The staged
    /// edge list is consumed and released here.
    pub fn finish(self) -> CSRGraph {
        let EdgeListBuilder { vertex_mapper, mut edges } = self;
        let vertex_count = vertex_mapper.len();

        // Equal pairs are indistinguishable, so an unstable sort gives the same
        // result as a stable one.
        edges.sort_unstable();

        let mut degrees = vec![0usize; vertex_count];
        for &(src, _) in &edges {
            degrees[src as usize] += 1;
        }

        // Exclusive prefix sum, row_offsets[vertex_count] == edge count.
        let mut row_offsets = Vec::with_capacity(vertex_count + 1);
        let mut current_offset = 0usize;
        row_offsets.push(current_offset);
        for degree in degrees {
            current_offset += degree;
            row_offsets.push(current_offset);
        }

        let column_indices = edges.iter().map(|&(_, dst)| dst).collect::<Vec<_>>();
        drop(edges);

        CSRGraph {
            row_offsets,
            column_indices,
            vertex_mapper,
        }
    }
}

impl CSRGraph {
    /// Builds a graph from in-memory raw edges.
    ///
    /// Fails with `GraphError::TooManyVertices` if the edges name more distinct
    /// vertices than `InternalIndex` can address.
    pub fn from_edges<I>(edges: I, edge_capacity: usize) -> Result<CSRGraph>
    where
        I: IntoIterator<Item = RawEdge>,
    {
        let mut builder = EdgeListBuilder::with_capacity(edge_capacity);
        for (src, dst) in edges {
            builder.push(src, dst)?;
        }
        Ok(builder.finish())
    }

    /// Builds a graph from a text edge list of `<src> <dst>` integer pairs.
    ///
    /// Scanning stops silently at the first token that is not an integer, see
    /// `EdgeScanner`. Read failures, and more distinct vertices than the index
    /// space holds, are reported as errors.
    pub fn from_reader<R: BufRead>(reader: R, config: &EngineConfig) -> io::Result<CSRGraph> {
        let mut builder = EdgeListBuilder::with_capacity(config.edge_capacity);

        let pb = if config.show_progress {
            let pb = ProgressBar::new_spinner();
            pb.set_style(ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} edges {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()));
            pb.set_message("Graph Loading.");
            pb
        } else {
            ProgressBar::hidden()
        };

        let mut scanner = EdgeScanner::new(reader);
        for edge in &mut scanner {
            let (src, dst) = edge?;
            builder
                .push(src, dst)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
            pb.inc(1);
        }
        if scanner.truncated() {
            debug!(
                edges = builder.edge_count(),
                "edge scan stopped at a token that does not complete an integer pair"
            );
        }
        pb.finish_with_message("Graph Loaded.");

        Ok(builder.finish())
    }

    /// Opens `path` and builds a graph from its edge list.
    pub fn from_edge_file<P: AsRef<Path>>(path: P, config: &EngineConfig) -> Result<CSRGraph> {
        let path = path.as_ref();
        let start = Instant::now();

        let io_error = |source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        };
        let graph_file = File::open(path).map_err(io_error)?;
        let graph_reader = BufReader::with_capacity(READ_BUFFER_SIZE, graph_file);
        let graph = CSRGraph::from_reader(graph_reader, config).map_err(io_error)?;

        info!(
            path = %path.display(),
            vertex_count = graph.vertex_count(),
            edge_count = graph.edge_count(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "graph loaded"
        );
        Ok(graph)
    }
}

#[cfg(test)]
mod test_graph_io {
    use std::fs;
    use std::io::Cursor;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use tempfile::TempDir;

    use super::*;

    fn load_str(content: &str) -> CSRGraph {
        CSRGraph::from_reader(Cursor::new(content), &EngineConfig::default()).unwrap()
    }

    /// Checks every structural invariant of a built graph.
    fn assert_csr_invariants(graph: &CSRGraph) {
        let offsets = graph.row_offsets();
        assert_eq!(offsets.len(), graph.vertex_count() + 1);
        assert_eq!(offsets[0], 0);
        assert_eq!(offsets[graph.vertex_count()], graph.edge_count());
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]), "offsets must be non-decreasing");
        assert!(graph
            .column_indices()
            .iter()
            .all(|&target| (target as usize) < graph.vertex_count()));

        let degree_sum: usize = (0..graph.vertex_count() as InternalIndex)
            .map(|v| graph.out_degree(v))
            .sum();
        assert_eq!(degree_sum, graph.edge_count());
    }

    fn scan(content: &[u8]) -> Vec<RawEdge> {
        EdgeScanner::new(Cursor::new(content))
            .collect::<io::Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_scan_tokens() {
        assert_eq!(scan(b"1 2\n"), vec![(1, 2)]);
        assert_eq!(scan(b"  -7\t9223372036854775807\r\n"), vec![(-7, i64::MAX)]);
        assert_eq!(scan(b"+3 4"), vec![(3, 4)]);
        assert!(scan(b"\n").is_empty());
        assert!(scan(b"1\n").is_empty());
        assert_eq!(scan(b"1 2 3\n"), vec![(1, 2)]);
        assert!(scan(b"# comment\n1 2\n").is_empty());
        assert!(scan(b"1 x\n").is_empty());
        assert!(scan(b"9223372036854775808 1\n").is_empty());
        assert_eq!(scan(&[b'5', b' ', b'6', b' ', 0xff, b'1']), vec![(5, 6)]);
    }

    #[test]
    fn test_scan_ignores_line_structure() {
        for content in ["1 2\n\n3 4\n", "1 2 3 4\n", "1 2\n3\n4\n"] {
            assert_eq!(scan(content.as_bytes()), vec![(1, 2), (3, 4)], "input {content:?}");
            let graph = load_str(content);
            assert_eq!(graph.edge_count(), 2, "input {content:?}");
            assert_eq!(graph.vertex_mapper().inverse(), &[1, 2, 3, 4]);
        }
    }

    #[test]
    fn test_scanner_reports_truncation() {
        let mut scanner = EdgeScanner::new(Cursor::new("1 2\n3 4\n"));
        assert_eq!(scanner.by_ref().count(), 2);
        assert!(!scanner.truncated());

        let mut scanner = EdgeScanner::new(Cursor::new("1 2\n3\n"));
        assert_eq!(scanner.by_ref().count(), 1);
        assert!(scanner.truncated());

        let mut scanner = EdgeScanner::new(Cursor::new("1 2\nx 4\n"));
        assert_eq!(scanner.by_ref().count(), 1);
        assert!(scanner.truncated());
    }

    #[test]
    fn test_build_small_graph() {
        let graph = load_str("1 2\n2 3\n1 3\n");
        assert_eq!(graph.vertex_mapper().inverse(), &[1, 2, 3]);
        assert_eq!(graph.row_offsets(), &[0, 2, 3, 3]);
        assert_eq!(graph.column_indices(), &[1, 2, 2]);
        assert_csr_invariants(&graph);
    }

    #[test]
    fn test_targets_sorted_within_source() {
        // Source 5 lists its targets out of order, and 9 is seen before 7.
        let graph = load_str("5 9\n5 7\n7 5\n5 5\n");
        assert_eq!(graph.vertex_mapper().inverse(), &[5, 9, 7]);
        // Internal: 0->1, 0->2, 2->0, 0->0
        assert_eq!(graph.row_offsets(), &[0, 3, 3, 4]);
        assert_eq!(graph.column_indices(), &[0, 1, 2, 0]);
    }

    #[test]
    fn test_duplicates_and_self_loops_kept() {
        let graph = load_str("4 4\n4 8\n4 8\n");
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.column_indices(), &[0, 1, 1]);
        assert_csr_invariants(&graph);
    }

    #[test]
    fn test_truncates_at_malformed_token() {
        let graph = load_str("1 2\n2 3\nbogus line\n3 4\n");
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.internal_index(4), None);

        // The dangling 3 is never paired, so it is never mapped.
        let graph = load_str("1 2\n3 x\n4 5\n");
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.internal_index(3), None);
    }

    #[test]
    fn test_index_space_exhausted() {
        let mut builder = EdgeListBuilder::with_vertex_mapper(VertexMapper::with_index_limit(2), 0);
        builder.push(1, 2).unwrap();
        builder.push(2, 1).unwrap();
        let err = builder.push(1, 3).unwrap_err();
        assert!(matches!(err, GraphError::TooManyVertices { limit: 2 }));
        assert_eq!(builder.edge_count(), 2);
        assert_eq!(builder.finish().vertex_count(), 2);
    }

    #[test]
    fn test_last_line_without_newline() {
        let graph = load_str("1 2\n2 3");
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_empty_input() {
        let graph = load_str("");
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.row_offsets(), &[0]);
        assert_csr_invariants(&graph);
    }

    #[test]
    fn test_random_graph_invariants() {
        let mut rng = StdRng::seed_from_u64(2024);
        let edges = (0..20_000)
            .map(|_| (rng.gen_range(-500i64..500) * 7919, rng.gen_range(-500i64..500) * 7919))
            .collect::<Vec<_>>();
        let graph = CSRGraph::from_edges(edges.clone(), edges.len()).unwrap();
        assert_eq!(graph.edge_count(), edges.len());
        assert_csr_invariants(&graph);

        // Every input edge is present in the CSR.
        for (src, dst) in edges.iter().take(200) {
            assert!(graph.raw_neighbors(*src).contains(dst));
        }
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.txt");
        let err = CSRGraph::from_edge_file(&path, &EngineConfig::default()).unwrap_err();
        match err {
            GraphError::Io { path: err_path, .. } => assert_eq!(err_path, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reload_is_identical() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("edges.txt");
        fs::write(&path, "100 -3\n-3 77\n100 77\n77 100\n5 5\n").unwrap();

        let first = CSRGraph::from_edge_file(&path, &EngineConfig::default()).unwrap();
        let second = CSRGraph::from_edge_file(&path, &EngineConfig::default()).unwrap();
        assert_eq!(first.row_offsets(), second.row_offsets());
        assert_eq!(first.column_indices(), second.column_indices());
        assert_eq!(first.vertex_mapper(), second.vertex_mapper());
    }
}
