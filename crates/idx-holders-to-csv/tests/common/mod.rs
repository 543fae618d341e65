use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

/// Column stops of the fixture layout: sequence, issuer code, holder name,
/// then two date groups of three sub-columns each.
pub const STOPS: [usize; 9] = [0, 4, 16, 38, 50, 62, 74, 86, 98];

/// Lays `cells` out on the fixture grid; `None` leaves the column blank.
pub fn aligned(cells: &[Option<&str>]) -> String {
    let mut line = String::new();
    for (stop, cell) in STOPS.iter().zip(cells) {
        let Some(text) = cell else {
            continue;
        };
        while line.chars().count() < *stop {
            line.push(' ');
        }
        line.push_str(text);
    }
    line
}

/// Header line plus sub-header line of a holdings page.
pub fn holdings_header() -> Vec<String> {
    vec![
        aligned(&[
            Some("No"),
            Some("Kode Efek"),
            Some("Nama Pemegang Saham"),
            Some("Kepemilikan Per 01-JAN-2025"),
            None,
            None,
            Some("Kepemilikan Per 02-FEB-2025"),
        ]),
        aligned(&[
            Some("No"),
            Some("Kode Efek"),
            Some("Nama Pemegang Saham"),
            Some("Jumlah"),
            Some("Gabungan"),
            Some("Persen"),
            Some("Jumlah"),
            Some("Gabungan"),
            Some("Persen"),
        ]),
    ]
}

/// Writes a PDF with one text line per entry, in a monospaced font, one PDF
/// page per element of `pages`.
pub fn write_text_pdf(
    path: &Path,
    pages: &[Vec<String>],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut page_ids = Vec::new();

    for lines in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 7.into()]),
            Operation::new("TL", vec![10.into()]),
            Operation::new("Td", vec![20.into(), 560.into()]),
        ];

        for (index, line) in lines.iter().enumerate() {
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(line.as_str())],
            ));
            if index + 1 < lines.len() {
                operations.push(Operation::new("T*", vec![]));
            }
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| (*id).into()).collect::<Vec<_>>(),
            "Count" => i64::try_from(page_ids.len())?,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 842.into(), 595.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    doc.save(path)?;
    Ok(())
}
