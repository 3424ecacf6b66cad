//! Grouping of staging rows into documents

use std::collections::HashMap;

use einvoice_domain::{DocumentCategory, StagedDocument, StagingRow};

/// Group rows by reference number.
///
/// Documents come out in order of first appearance. The first row of each
/// reference supplies the header and is also the first line item; every row
/// sharing the reference becomes a line, in extraction order.
pub fn group_rows(category: DocumentCategory, rows: Vec<StagingRow>) -> Vec<StagedDocument> {
    let mut documents: Vec<StagedDocument> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for StagingRow { header, line } in rows {
        if let Some(&pos) = index.get(&header.ref_no) {
            documents[pos].lines.push(line);
            continue;
        }
        index.insert(header.ref_no.clone(), documents.len());
        documents.push(StagedDocument { category, header, lines: vec![line] });
    }

    documents
}
