use crate::connect::Connection;
use crate::output::{print_json, print_line, print_table};
use recycle_core::PoolGateway;

// ---------------------------------------------------------------------------
// nodes
// ---------------------------------------------------------------------------

pub fn nodes(conn: &Connection, pool: &str, json: bool) -> anyhow::Result<()> {
    let client = conn.client()?;
    let nodes = client.list_nodes(pool)?;

    if json {
        return print_json(&nodes);
    }

    if nodes.is_empty() {
        print_line(&format!("No nodes in pool \"{pool}\"."))?;
        return Ok(());
    }

    let rows = nodes
        .iter()
        .map(|n| vec![n.address.clone(), n.status.clone()])
        .collect();
    print_table(&["ADDRESS", "STATUS"], rows)
}

// ---------------------------------------------------------------------------
// templates
// ---------------------------------------------------------------------------

pub fn templates(conn: &Connection, pool: &str, json: bool) -> anyhow::Result<()> {
    let client = conn.client()?;
    let templates = client.list_templates(pool)?;

    if json {
        return print_json(&templates);
    }

    if templates.is_empty() {
        print_line(&format!("No templates for pool \"{pool}\"."))?;
        return Ok(());
    }

    let rows = templates
        .iter()
        .map(|t| vec![t.name.clone(), t.iaas.clone(), params(t)])
        .collect();
    print_table(&["NAME", "IAAS", "PARAMS"], rows)
}

fn params(template: &recycle_core::Template) -> String {
    template
        .params
        .iter()
        .map(|p| format!("{}={}", p.name, p.value))
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// machines
// ---------------------------------------------------------------------------

pub fn machines(conn: &Connection, json: bool) -> anyhow::Result<()> {
    let client = conn.client()?;
    let machines = client.list_machines()?;

    if json {
        return print_json(&machines);
    }

    if machines.is_empty() {
        print_line("No IaaS machines.")?;
        return Ok(());
    }

    let rows = machines
        .iter()
        .map(|m| {
            vec![
                m.id.clone(),
                m.address.clone(),
                m.iaas.clone(),
                m.status.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "ADDRESS", "IAAS", "STATUS"], rows)
}
