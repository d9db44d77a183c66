use crate::models::{ArRecord, ArchiveRow, ArchivedRecord, LotRecord, OrderRecord};
use sqlx::PgPool;

/// 查询需要核对的定金订单
pub async fn list_orders(pool: &PgPool, order_numbers: &[String]) -> Result<Vec<OrderRecord>, sqlx::Error> {
    sqlx::query_as::<_, OrderRecord>(
        r#"
        SELECT sa.order_number,
               sa.total_number,
               sa.ar_bill_code,
               sa.closed_by::text AS closed_by,
               su.user_name AS closed_by_name,
               sh.shop_name
        FROM sales.sales_order sa
        LEFT JOIN basedata.shop sh ON sa.shop_id = sh.shop_id
        LEFT JOIN admin.system_user su ON sa.closed_by = su.system_user_id
        WHERE (
            sa.sales_order_type = 8
            OR (sa.sales_order_type = 1 AND sa.sales_type = 8)
            OR sa.sales_type = 127
        )
          AND sa.order_number = ANY($1)
        "#
    )
    .bind(order_numbers)
    .fetch_all(pool)
    .await
}

/// 查询 ERP 中已存在的批号
pub async fn list_lots(pool: &PgPool, lot_codes: &[String]) -> Result<Vec<LotRecord>, sqlx::Error> {
    sqlx::query_as::<_, LotRecord>(
        r#"
        SELECT lot_code
        FROM lot_lot_master
        WHERE lot_code = ANY($1)
        "#
    )
    .bind(lot_codes)
    .fetch_all(pool)
    .await
}

/// 按应收单号汇总应收金额
///
/// 金额按文本返回，由调用方解析。
pub async fn sum_ar_bills(pool: &PgPool, doc_nos: &[String]) -> Result<Vec<ArRecord>, sqlx::Error> {
    sqlx::query_as::<_, ArRecord>(
        r#"
        SELECT a.doc_no,
               SUM(b.arfc_money_total_money)::text AS total_money
        FROM ar_ar_bill_head a
        INNER JOIN ar_ar_bill_line b ON b.ar_bill_head = a.id
        WHERE a.doc_no = ANY($1)
        GROUP BY a.doc_no
        "#
    )
    .bind(doc_nos)
    .fetch_all(pool)
    .await
}

/// 查询历史归档中已存在的单据
pub async fn list_archived(pool: &PgPool, doc_nos: &[String]) -> Result<Vec<ArchivedRecord>, sqlx::Error> {
    sqlx::query_as::<_, ArchivedRecord>(
        r#"
        SELECT doc_no, total_money::text AS total_money
        FROM store_deposit_return
        WHERE doc_no = ANY($1)
        "#
    )
    .bind(doc_nos)
    .fetch_all(pool)
    .await
}

/// 批量写入归档表，返回影响行数
pub async fn insert_archive(pool: &PgPool, rows: &[ArchiveRow]) -> Result<u64, sqlx::Error> {
    if rows.is_empty() {
        return Ok(0);
    }

    tracing::debug!("开始构建批量插入语句, {} 条记录", rows.len());

    let mut query_builder = sqlx::QueryBuilder::new(
        "INSERT INTO store_deposit_return (total_money, doc_no) "
    );

    query_builder.push_values(rows, |mut b, row| {
        b.push_bind(&row.amount)
            .push_unseparated("::numeric")
            .push_bind(&row.order_key);
    });

    let result = query_builder.build().execute(pool).await?;
    Ok(result.rows_affected())
}
