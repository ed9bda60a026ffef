#![allow(dead_code)]

use dpd_shipment::{ClientOptions, Credentials, ShipmentClient};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

pub fn credentials() -> Credentials {
    Credentials::new("client-key-1", "shipper@example.com").with_password("secret")
}

pub fn client_for(base_url: &str) -> ShipmentClient {
    ShipmentClient::new(
        "client-key-1",
        "shipper@example.com",
        "secret",
        ClientOptions::default().with_base_url(base_url),
    )
    .unwrap()
}

/// 產生每頁內容為 `{marker}-{page}` 的 PDF
pub fn sample_pdf(marker: &str, pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::new();

    for i in 0..pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tj", vec![Object::string_literal(format!("{}-{}", marker, i))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(283),
                Object::Integer(425),
            ],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// 依頁序回傳每頁的內容串流文字
pub fn page_contents(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .into_values()
        .map(|page_id| String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).to_string())
        .collect()
}
