use super::clean::required_column;
use crate::error::Error;
use crate::table::{Table, Value};

pub fn gross_profit(sales_dollars: f64, purchase_dollars: f64) -> f64 {
    sales_dollars - purchase_dollars
}

/// Gross profit as a percentage of sales; 0 when there were no sales.
pub fn profit_margin(gross_profit: f64, sales_dollars: f64) -> f64 {
    ratio(gross_profit, sales_dollars) * 100.0
}

pub fn stock_turnover(sales_quantity: f64, purchase_quantity: f64) -> f64 {
    ratio(sales_quantity, purchase_quantity)
}

pub fn sales_to_purchase_ratio(sales_dollars: f64, purchase_dollars: f64) -> f64 {
    ratio(sales_dollars, purchase_dollars)
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Append `GrossProfit`, `ProfitMargin`, `StockTurnover` and
/// `SalesToPurchaseRatio`. Expects nulls to have been filled already.
pub fn add_derived_metrics(table: &mut Table) -> Result<(), Error> {
    let sales_dollars = numeric_column(table, "TotalSalesDollars")?;
    let purchase_dollars = numeric_column(table, "TotalPurchaseDollars")?;
    let sales_quantity = numeric_column(table, "TotalSalesQuantity")?;
    let purchase_quantity = numeric_column(table, "TotalPurchaseQuantity")?;

    let n = table.len();
    let mut profit = Vec::with_capacity(n);
    let mut margin = Vec::with_capacity(n);
    let mut turnover = Vec::with_capacity(n);
    let mut sales_ratio = Vec::with_capacity(n);

    for i in 0..n {
        let gp = gross_profit(sales_dollars[i], purchase_dollars[i]);
        profit.push(Value::Real(gp));
        margin.push(Value::Real(profit_margin(gp, sales_dollars[i])));
        turnover.push(Value::Real(stock_turnover(sales_quantity[i], purchase_quantity[i])));
        sales_ratio.push(Value::Real(sales_to_purchase_ratio(
            sales_dollars[i],
            purchase_dollars[i],
        )));
    }

    table.add_column("GrossProfit", profit)?;
    table.add_column("ProfitMargin", margin)?;
    table.add_column("StockTurnover", turnover)?;
    table.add_column("SalesToPurchaseRatio", sales_ratio)?;
    Ok(())
}

fn numeric_column(table: &Table, name: &str) -> Result<Vec<f64>, Error> {
    let idx = required_column(table, name)?;
    table
        .rows()
        .iter()
        .enumerate()
        .map(|(row, values)| {
            values[idx].coerce_numeric().as_f64().ok_or_else(|| {
                Error::Query(format!(
                    "non-numeric value {:?} in column '{}' at row {}",
                    values[idx], name, row
                ))
            })
        })
        .collect()
}
