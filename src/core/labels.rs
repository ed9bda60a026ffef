use crate::adapters::http::HttpTransport;
use crate::config::ClientOptions;
use crate::domain::model::{LabelDocument, LabelSource, MergedLabelOutput};
use crate::domain::ports::Transport;
use crate::utils::error::{Result, ShipmentError};
use base64::Engine;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use std::time::Duration;

/// PDF 檔頭
pub const PDF_SIGNATURE: &[u8] = b"%PDF-";

const OUTPUT_PDF_VERSION: &str = "1.5";

// 頁面可以從父節點繼承的屬性
const INHERITABLE_PAGE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];
const MAX_PAGE_TREE_DEPTH: usize = 64;

/// 以檔頭判斷內容是否為 PDF（允許前置空白）
pub fn is_pdf(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..].starts_with(PDF_SIGNATURE)
}

/// 取得與合併運送標籤
///
/// 單張取得是嚴格的：下載失敗或內容不是 PDF 都回傳錯誤。
/// 合併是寬鬆的：無法載入的標籤記錄後略過，其餘頁面依輸入順序串接。
pub struct LabelMerger<T: Transport = HttpTransport> {
    transport: T,
    timeout: Duration,
}

impl LabelMerger<HttpTransport> {
    pub fn new(options: &ClientOptions) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new()?, options.timeout()))
    }
}

impl<T: Transport> LabelMerger<T> {
    pub fn with_transport(transport: T, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// 下載標籤並驗證為 PDF
    pub fn fetch_label(&self, url: &str) -> Result<LabelDocument> {
        tracing::debug!("🏷️ Fetching label from {}", url);
        let body = self
            .transport
            .get_bytes(url, self.timeout)
            .map_err(|e| ShipmentError::LabelFetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let bytes = decode_pdf_payload(url, body)?;
        Ok(LabelDocument {
            source: url.to_string(),
            bytes,
        })
    }

    pub fn load_label(&self, source: &LabelSource) -> Result<LabelDocument> {
        match source {
            LabelSource::Url(url) => self.fetch_label(url),
            LabelSource::Inline(payload) => {
                let name = source.describe();
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(strip_whitespace(payload.as_bytes()))?;
                if !is_pdf(&bytes) {
                    return Err(ShipmentError::UnsupportedLabel { source_name: name });
                }
                Ok(LabelDocument {
                    source: name,
                    bytes,
                })
            }
        }
    }

    /// 依輸入順序合併標籤；無法取得或無法解析的標籤會被略過
    ///
    /// 沒有任何有效標籤時回傳 0 頁的空白文件，不視為錯誤。
    pub fn merge_labels<S>(&self, sources: &[S]) -> Result<MergedLabelOutput>
    where
        S: AsRef<str>,
    {
        let mut documents = Vec::with_capacity(sources.len());
        let mut skipped = Vec::new();

        for source in sources {
            let source = LabelSource::parse(source.as_ref());
            match self.load_label(&source) {
                Ok(label) => documents.push(label),
                Err(e) => {
                    tracing::warn!("⚠️ Skipping label {}: {}", source.describe(), e);
                    skipped.push(source.describe());
                }
            }
        }

        let mut output = merge_documents(documents)?;
        output.skipped.extend(skipped);

        tracing::info!(
            "✅ Merged {} labels into {} pages ({} skipped)",
            output.merged_sources.len(),
            output.page_count,
            output.skipped.len()
        );
        Ok(output)
    }
}

/// 合併已載入的標籤；無法解析的 PDF 會被略過並記錄在 `skipped`
pub fn merge_documents(labels: Vec<LabelDocument>) -> Result<MergedLabelOutput> {
    let mut output = Document::with_version(OUTPUT_PDF_VERSION);
    let pages_id = output.new_object_id();
    let mut kids: Vec<Object> = Vec::new();
    let mut merged_sources = Vec::new();
    let mut skipped = Vec::new();

    for label in labels {
        let mut document = match Document::load_mem(&label.bytes) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("⚠️ Skipping unreadable PDF {}: {}", label.source, e);
                skipped.push(label.source);
                continue;
            }
        };

        document.renumber_objects_with(output.max_id + 1);
        output.max_id = document.max_id;

        let pages = match collect_pages(&document, pages_id) {
            Ok(pages) => pages,
            Err(e) => {
                tracing::warn!("⚠️ Skipping PDF with broken page tree {}: {}", label.source, e);
                skipped.push(label.source);
                continue;
            }
        };
        tracing::debug!("🏷️ Appending {} pages from {}", pages.len(), label.source);

        for (object_id, object) in document.objects {
            // 頁面樹與目錄由輸出文件重建
            let structural = matches!(
                object.type_name().unwrap_or(""),
                "Catalog" | "Pages" | "Page" | "Outlines" | "Outline" | "XRef" | "ObjStm"
            );
            if !structural {
                output.objects.insert(object_id, object);
            }
        }

        for (page_id, page) in pages {
            output.objects.insert(page_id, Object::Dictionary(page));
            kids.push(Object::Reference(page_id));
        }
        merged_sources.push(label.source);
    }

    let page_count = kids.len();
    output.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        }),
    );
    let catalog_id = output.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    output.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    output.save_to(&mut bytes)?;

    Ok(MergedLabelOutput {
        bytes,
        page_count,
        merged_sources,
        skipped,
    })
}

/// 依頁碼順序取出頁面，並改掛到輸出文件的頁樹下
fn collect_pages(document: &Document, parent_id: ObjectId) -> Result<Vec<(ObjectId, Dictionary)>> {
    document
        .get_pages()
        .into_values()
        .map(|page_id| -> Result<(ObjectId, Dictionary)> {
            let mut page = document.get_dictionary(page_id)?.clone();
            inherit_page_attributes(document, &mut page);
            page.set("Parent", parent_id);
            Ok((page_id, page))
        })
        .collect()
}

/// 把頁面從頁樹繼承的屬性寫回頁面本身，避免換了父節點後遺失
fn inherit_page_attributes(document: &Document, page: &mut Dictionary) {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    // 深度上限防止損壞檔案中的循環參照
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        let Some(parent_id) = parent else {
            break;
        };
        let Ok(node) = document.get_dictionary(parent_id) else {
            break;
        };
        for key in INHERITABLE_PAGE_KEYS {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
}

/// 回應內容可能是 PDF 本身，也可能是 base64 編碼的 PDF
fn decode_pdf_payload(source: &str, body: Vec<u8>) -> Result<Vec<u8>> {
    if is_pdf(&body) {
        return Ok(body);
    }

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(strip_whitespace(&body))
        .ok()
        .filter(|bytes| is_pdf(bytes));

    decoded.ok_or_else(|| ShipmentError::UnsupportedLabel {
        source_name: source.to_string(),
    })
}

fn strip_whitespace(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect()
}
