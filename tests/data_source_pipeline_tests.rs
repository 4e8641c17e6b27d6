use std::cell::RefCell;
use std::rc::Rc;

use chartloom::api::{
    DataSource, DataSourceRenderer, DataSourceState, Diagnostics, RefreshRequest, RenderContext,
    RenderPass,
};
use chartloom::core::{Axis, AxisId, AxisSet, ComponentId, Rect, Size};
use chartloom::render::RecordingSurface;

type Log = Rc<RefCell<Vec<String>>>;

struct Probe {
    name: &'static str,
    source: String,
    opt_in: bool,
    scale: f64,
    axis: Option<AxisId>,
    log: Log,
    visited: Vec<usize>,
    limits_at_postamble: Option<(f64, f64)>,
}

impl Probe {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            source: "data".to_owned(),
            opt_in: true,
            scale: 1.0,
            axis: None,
            log: Rc::clone(log),
            visited: Vec::new(),
            limits_at_postamble: None,
        }
    }

    fn record(&self, event: String) {
        self.log.borrow_mut().push(event);
    }
}

impl DataSourceRenderer<f64> for Probe {
    fn data_source_name(&self) -> &str {
        &self.source
    }

    fn preamble<'a>(
        &'a mut self,
        _ctx: &mut RenderContext<'_>,
    ) -> Option<Box<dyn RenderPass<f64> + 'a>> {
        self.record(format!("preamble:{}", self.name));
        if !self.opt_in {
            return None;
        }
        self.visited.clear();
        Some(Box::new(ProbePass { probe: self }))
    }
}

struct ProbePass<'a> {
    probe: &'a mut Probe,
}

impl RenderPass<f64> for ProbePass<'_> {
    fn render(&mut self, ctx: &mut RenderContext<'_>, index: usize, item: &f64) {
        self.probe
            .record(format!("render:{}:{index}", self.probe.name));
        self.probe.visited.push(index);
        if let Some(axis) = self.probe.axis.and_then(|id| ctx.axes.get_mut(id)) {
            axis.update_limits(item * self.probe.scale);
        }
    }

    fn render_complete(&mut self, _ctx: &mut RenderContext<'_>) {
        self.probe.record(format!("complete:{}", self.probe.name));
    }

    fn postamble(self: Box<Self>, ctx: &mut RenderContext<'_>) {
        let probe = self.probe;
        probe.record(format!("postamble:{}", probe.name));
        probe.limits_at_postamble = probe
            .axis
            .and_then(|id| ctx.axes.get(id))
            .map(|axis| (axis.minimum(), axis.maximum()));
    }
}

fn run(
    source: &mut DataSource<f64>,
    renderers: &mut [&mut dyn DataSourceRenderer<f64>],
    axes: &mut AxisSet,
    log: &Log,
) -> bool {
    let mut surface = RecordingSurface::new();
    let mut diagnostics = Diagnostics::new();
    let area = Rect::new(0.0, 0.0, 400.0, 300.0);
    let mut ctx = RenderContext {
        dimensions: Size::new(400.0, 300.0),
        area,
        series_area: area,
        axes,
        surface: &mut surface,
        errors: &mut diagnostics,
    };
    let hook_log = Rc::clone(log);
    let mut hook = move |name: &str, _ctx: &mut RenderContext<'_>| {
        hook_log.borrow_mut().push(format!("hook:{name}"));
    };
    source.render(renderers, &mut ctx, &mut hook)
}

fn source_with(items: Vec<f64>) -> DataSource<f64> {
    let mut source = DataSource::new("data").with_items(items);
    source.register(ComponentId::new(1)).expect("register first");
    source.register(ComponentId::new(2)).expect("register second");
    source
}

#[test]
fn completion_barrier_precedes_hook_and_postambles() {
    let log: Log = Rc::default();
    let mut source = source_with(vec![1.0, 2.0]);
    let mut first = Probe::new("a", &log);
    let mut second = Probe::new("b", &log);

    let mut renderers: Vec<&mut dyn DataSourceRenderer<f64>> = vec![&mut first, &mut second];
    assert!(run(&mut source, &mut renderers, &mut AxisSet::new(), &log));

    let expected = [
        "preamble:a",
        "preamble:b",
        "render:a:0",
        "render:b:0",
        "render:a:1",
        "render:b:1",
        "complete:a",
        "complete:b",
        "hook:data",
        "postamble:a",
        "postamble:b",
    ];
    assert_eq!(*log.borrow(), expected);
    assert_eq!(source.state(), DataSourceState::Clean);
}

#[test]
fn every_item_is_visited_once_per_renderer() {
    let log: Log = Rc::default();
    let mut source = source_with(vec![3.0, 1.0, 4.0, 1.0, 5.0]);
    let mut first = Probe::new("a", &log);
    let mut second = Probe::new("b", &log);

    let mut renderers: Vec<&mut dyn DataSourceRenderer<f64>> = vec![&mut first, &mut second];
    run(&mut source, &mut renderers, &mut AxisSet::new(), &log);

    assert_eq!(first.visited, vec![0, 1, 2, 3, 4]);
    assert_eq!(second.visited, vec![0, 1, 2, 3, 4]);
}

#[test]
fn renderers_sharing_an_axis_see_final_limits() {
    let log: Log = Rc::default();
    let mut axes = AxisSet::new();
    let values = axes.insert(Axis::value("values")).expect("insert axis");
    let mut source = source_with(vec![1.0, -2.0, 3.0]);

    let mut plain = Probe::new("a", &log);
    plain.axis = Some(values);
    let mut doubled = Probe::new("b", &log);
    doubled.axis = Some(values);
    doubled.scale = 2.0;

    let mut renderers: Vec<&mut dyn DataSourceRenderer<f64>> = vec![&mut plain, &mut doubled];
    run(&mut source, &mut renderers, &mut axes, &log);

    assert_eq!(plain.limits_at_postamble, Some((-4.0, 6.0)));
    assert_eq!(doubled.limits_at_postamble, Some((-4.0, 6.0)));
}

#[test]
fn opted_out_renderer_sees_nothing_but_the_pass_completes() {
    let log: Log = Rc::default();
    let mut source = source_with(vec![1.0]);
    let mut active = Probe::new("a", &log);
    let mut idle = Probe::new("b", &log);
    idle.opt_in = false;

    let mut renderers: Vec<&mut dyn DataSourceRenderer<f64>> = vec![&mut active, &mut idle];
    assert!(run(&mut source, &mut renderers, &mut AxisSet::new(), &log));

    let events = log.borrow();
    assert!(events.iter().all(|event| !event.starts_with("render:b")));
    assert!(!events.contains(&"postamble:b".to_owned()));
    assert!(events.contains(&"postamble:a".to_owned()));
    assert_eq!(source.state(), DataSourceState::Clean);
}

#[test]
fn all_renderers_opting_out_still_cleans_the_source() {
    let log: Log = Rc::default();
    let mut source = source_with(vec![1.0, 2.0]);
    let mut idle = Probe::new("a", &log);
    idle.opt_in = false;

    let mut renderers: Vec<&mut dyn DataSourceRenderer<f64>> = vec![&mut idle];
    assert!(run(&mut source, &mut renderers, &mut AxisSet::new(), &log));
    assert_eq!(*log.borrow(), ["preamble:a", "hook:data"]);
    assert_eq!(source.state(), DataSourceState::Clean);
}

#[test]
fn clean_source_is_not_traversed() {
    let log: Log = Rc::default();
    let mut source = source_with(vec![1.0]);
    let mut probe = Probe::new("a", &log);

    {
        let mut renderers: Vec<&mut dyn DataSourceRenderer<f64>> = vec![&mut probe];
        assert!(run(&mut source, &mut renderers, &mut AxisSet::new(), &log));
    }
    log.borrow_mut().clear();

    let mut renderers: Vec<&mut dyn DataSourceRenderer<f64>> = vec![&mut probe];
    assert!(!run(&mut source, &mut renderers, &mut AxisSet::new(), &log));
    assert!(log.borrow().is_empty());
}

#[test]
fn missing_items_or_renderers_skip_the_pass() {
    let log: Log = Rc::default();
    let mut empty = DataSource::<f64>::new("data");
    let mut probe = Probe::new("a", &log);
    {
        let mut renderers: Vec<&mut dyn DataSourceRenderer<f64>> = vec![&mut probe];
        assert!(!run(&mut empty, &mut renderers, &mut AxisSet::new(), &log));
    }
    assert_eq!(empty.state(), DataSourceState::Dirty);
    assert!(!empty.has_pending_render());

    let mut source = DataSource::new("data").with_items(vec![1.0]);
    assert!(!run(&mut source, &mut [], &mut AxisSet::new(), &log));
    assert!(source.is_dirty());
    assert!(log.borrow().is_empty());
}

#[test]
fn mutations_mark_dirty_and_raise_refresh_requests() {
    let log: Log = Rc::default();
    let mut source = source_with(vec![1.0]);
    let requests: Rc<RefCell<Vec<RefreshRequest>>> = Rc::default();
    let sink = Rc::clone(&requests);
    let subscription = source.on_refresh_request(move |request| {
        sink.borrow_mut().push(request.clone());
    });

    let mut probe = Probe::new("a", &log);
    {
        let mut renderers: Vec<&mut dyn DataSourceRenderer<f64>> = vec![&mut probe];
        run(&mut source, &mut renderers, &mut AxisSet::new(), &log);
    }
    assert!(!source.is_dirty());

    source.push_item(2.0);
    assert!(source.is_dirty());
    source.update_items(|items| items.retain(|item| *item > 1.0));
    assert_eq!(source.items(), Some(&[2.0][..]));
    source.set_items(None);

    assert_eq!(requests.borrow().len(), 3);
    assert!(
        requests
            .borrow()
            .iter()
            .all(|request| *request == RefreshRequest::DataSource("data".to_owned()))
    );

    assert!(source.remove_refresh_listener(subscription));
    source.refresh();
    assert_eq!(requests.borrow().len(), 3);
}

#[test]
fn registration_rejects_duplicates() {
    let mut source = DataSource::<f64>::new("data");
    let id = ComponentId::new(9);
    source.register(id).expect("first registration");
    assert!(source.register(id).is_err());
    assert_eq!(source.renderers(), &[id]);

    assert!(source.unregister(id));
    assert!(!source.unregister(id));
    assert!(source.renderers().is_empty());
}
