use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

const STOPS: [usize; 9] = [0, 4, 16, 38, 50, 62, 74, 86, 98];

fn aligned(cells: &[Option<&str>]) -> String {
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

/// One data line: sequence, issuer code (blank continues the previous
/// issuer), holder, and the percentage at both disclosure dates.
pub struct Holding<'a> {
    pub sequence: &'a str,
    pub issuer: Option<&'a str>,
    pub holder: &'a str,
    pub before: &'a str,
    pub after: &'a str,
}

fn holdings_page(rows: &[Holding<'_>]) -> Vec<String> {
    let mut lines = vec![
        aligned(&[
            Some("No"),
            Some("Kode Efek"),
            Some("Nama Pemegang Saham"),
            Some("Kepemilikan Per 01-JAN-2025"),
            None,
            None,
            Some("Kepemilikan Per 02-JAN-2025"),
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
    ];
    lines.extend(rows.iter().map(|row| {
        aligned(&[
            Some(row.sequence),
            row.issuer,
            Some(row.holder),
            Some("1,000"),
            Some("1,000"),
            Some(row.before),
            Some("1,000"),
            Some("1,000"),
            Some(row.after),
        ])
    }));
    lines
}

/// Cover page followed by one holdings page.
pub fn holdings_pdf(rows: &[Holding<'_>]) -> Vec<u8> {
    text_pdf(&[
        vec!["Pemegang Saham di atas 5%".to_string()],
        holdings_page(rows),
    ])
}

pub fn narrative_pdf() -> Vec<u8> {
    text_pdf(&[
        vec!["Pemegang Saham di atas 5%".to_string()],
        vec!["Tidak ada perubahan kepemilikan.".to_string()],
    ])
}

fn text_pdf(pages: &[Vec<String>]) -> Vec<u8> {
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
        let encoded = content.encode().expect("content stream should encode");
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        }));
    }

    let count = i64::try_from(page_ids.len()).expect("page count fits");
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| (*id).into()).collect::<Vec<_>>(),
            "Count" => count,
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

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("PDF should serialize");
    bytes
}
