use crate::error::Error;
use crate::storage::Database;
use crate::table::Table;
use tracing::debug;

/// Base tables the summary reads from, with the columns it touches.
pub const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    ("vendor_invoice", &["VendorNumber", "Freight"]),
    (
        "purchases",
        &[
            "VendorNumber",
            "VendorName",
            "Brand",
            "Description",
            "PurchasePrice",
            "Quantity",
            "Dollars",
        ],
    ),
    ("purchase_prices", &["Brand", "Price", "Volume"]),
    (
        "sales",
        &[
            "VendorNo",
            "Brand",
            "SalesQuantity",
            "SalesDollars",
            "SalesPrice",
            "ExciseTax",
        ],
    ),
];

/// Freight per vendor, purchases per (vendor, brand, price point) and sales per
/// (vendor, brand), left-joined onto the purchase side so every purchased
/// brand keeps its row. Ties on purchase dollars fall back to vendor and brand
/// so repeated runs produce the same row order.
pub const VENDOR_SUMMARY_SQL: &str = "
    WITH FreightSummary AS (
        SELECT
            VendorNumber,
            SUM(Freight) AS FreightCost
        FROM vendor_invoice
        GROUP BY VendorNumber
    ),

    PurchaseSummary AS (
        SELECT
            p.VendorNumber,
            p.VendorName,
            p.Brand,
            p.Description,
            p.PurchasePrice,
            pp.Price AS ActualPrice,
            pp.Volume,
            SUM(p.Quantity) AS TotalPurchaseQuantity,
            SUM(p.Dollars) AS TotalPurchaseDollars
        FROM purchases p
        JOIN purchase_prices pp
            ON p.Brand = pp.Brand
        WHERE p.PurchasePrice > 0
        GROUP BY
            p.VendorNumber, p.VendorName, p.Brand, p.Description,
            p.PurchasePrice, pp.Price, pp.Volume
    ),

    SalesSummary AS (
        SELECT
            VendorNo,
            Brand,
            SUM(SalesQuantity) AS TotalSalesQuantity,
            SUM(SalesDollars) AS TotalSalesDollars,
            SUM(SalesPrice) AS TotalSalesPrice,
            SUM(ExciseTax) AS TotalExciseTax
        FROM sales
        GROUP BY VendorNo, Brand
    )

    SELECT
        ps.VendorNumber,
        ps.VendorName,
        ps.Brand,
        ps.Description,
        ps.PurchasePrice,
        ps.ActualPrice,
        ps.Volume,
        ps.TotalPurchaseQuantity,
        ps.TotalPurchaseDollars,
        ss.TotalSalesQuantity,
        ss.TotalSalesDollars,
        ss.TotalSalesPrice,
        ss.TotalExciseTax,
        fs.FreightCost
    FROM PurchaseSummary ps
    LEFT JOIN SalesSummary ss
        ON ps.VendorNumber = ss.VendorNo
        AND ps.Brand = ss.Brand
    LEFT JOIN FreightSummary fs
        ON ps.VendorNumber = fs.VendorNumber
    ORDER BY ps.TotalPurchaseDollars DESC, ps.VendorNumber, ps.Brand,
             ps.PurchasePrice, ps.VendorName, ps.Description,
             ps.ActualPrice, ps.Volume
";

/// Fails with [`Error::Query`] naming the first absent table or column.
/// Table and column names are compared exactly, including case.
pub fn check_base_tables(db: &Database) -> Result<(), Error> {
    let tables = db.list_tables().map_err(query_error)?;
    for (table, required) in REQUIRED_SCHEMA {
        // sqlite resolves table names case-insensitively
        if !tables.iter().any(|t| t == table) {
            return Err(Error::Query(format!("missing table '{}'", table)));
        }
        let present = db.table_columns(table).map_err(query_error)?;
        if let Some(column) = required.iter().copied().find(|c| !present.iter().any(|p| p == c)) {
            return Err(Error::Query(format!(
                "table '{}' has no column '{}'",
                table, column
            )));
        }
    }
    Ok(())
}

/// Run the aggregation query against the base tables.
pub fn create_vendor_summary(db: &Database) -> Result<Table, Error> {
    check_base_tables(db)?;
    let table = db.query_table(VENDOR_SUMMARY_SQL).map_err(query_error)?;
    debug!("Vendor summary query returned {} rows", table.len());
    Ok(table)
}

fn query_error(e: rusqlite::Error) -> Error {
    Error::Query(e.to_string())
}
